// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema normalization: relabel, drop, derive volume density

use crate::error::{Error, Result};
use crate::schema::ColumnSet;
use crate::table::Table;
use crate::value::Value;

/// Relabel positionally, drop the unused columns and append the volume
/// density column.
pub fn normalize(table: Table, columns: &ColumnSet) -> Result<Table> {
    let table = table.rename_columns(&columns.labels)?;
    let table = table.drop_columns(&columns.drop)?;
    with_ratio(table, &columns.volume, &columns.area, &columns.density)
}

/// Append `output = numerator / denominator` for every row.
///
/// A missing operand gives `Null`. A zero denominator gives a non-finite
/// float, which is left for the renderer to discard.
pub fn with_ratio(table: Table, numerator: &str, denominator: &str, output: &str) -> Result<Table> {
    let num_idx = table.column_index(numerator)?;
    let den_idx = table.column_index(denominator)?;

    let values = table
        .rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            let n = numeric(&cells[num_idx], numerator, row)?;
            let d = numeric(&cells[den_idx], denominator, row)?;
            Ok(match (n, d) {
                (Some(n), Some(d)) => Value::Float(n / d),
                _ => Value::Null,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    table.with_column(output, values)
}

/// Numeric view of a cell. Text is accepted when it parses as a number.
fn numeric(value: &Value, column: &str, row: usize) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(i) => Ok(Some(*i as f64)),
        Value::Float(f) => Ok(Some(*f)),
        Value::Text(s) if s.trim().is_empty() => Ok(None),
        Value::Text(s) => s.trim().parse::<f64>().map(Some).map_err(|_| Error::NonNumeric {
            column: column.to_string(),
            row,
            value: s.clone(),
        }),
        other => Err(Error::NonNumeric {
            column: column.to_string(),
            row,
            value: other.to_string(),
        }),
    }
}
