// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Administrative region filter

use crate::error::Result;
use crate::schema::ColumnSet;
use crate::table::Table;

/// Planning area and municipality a map is drawn for
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionFilter {
    pub planning_area: String,
    pub municipality: String,
}

impl RegionFilter {
    pub fn new(planning_area: impl Into<String>, municipality: impl Into<String>) -> Self {
        Self {
            planning_area: planning_area.into(),
            municipality: municipality.into(),
        }
    }
}

impl Default for RegionFilter {
    /// Kitagawa village in the Aki planning area
    fn default() -> Self {
        Self::new("安芸", "北川村")
    }
}

/// Keep rows whose text cell in `column` equals `value` exactly.
/// Non-text cells never match.
pub fn filter_eq(table: Table, column: &str, value: &str) -> Result<Table> {
    let idx = table.column_index(column)?;
    Ok(table.retain(|row| row[idx].as_str() == Some(value)))
}

/// Keep the parcels of one planning area and municipality.
/// An empty result is valid.
pub fn filter_region(table: Table, columns: &ColumnSet, region: &RegionFilter) -> Result<Table> {
    let table = filter_eq(table, &columns.planning_area, &region.planning_area)?;
    filter_eq(table, &columns.municipality, &region.municipality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::Value;
    use forestmap_geometry::Crs;

    fn table() -> Table {
        let mut table = Table::new(
            vec!["planning_area".into(), "municipality".into()],
            None,
            Crs::Jgd2011,
        )
        .unwrap();
        for (p, m) in [("A", "B"), ("A", "C"), ("D", "B"), ("A", "B")] {
            table.push_row(vec![p.into(), m.into()]).unwrap();
        }
        table.push_row(vec![Value::Null, "B".into()]).unwrap();
        table
    }

    fn columns() -> ColumnSet {
        ColumnSet {
            planning_area: "planning_area".into(),
            municipality: "municipality".into(),
            ..ColumnSet::japanese()
        }
    }

    #[test]
    fn test_filter_both_fields() {
        let out = filter_region(table(), &columns(), &RegionFilter::new("A", "B")).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let region = RegionFilter::new("A", "B");
        let once = filter_region(table(), &columns(), &region).unwrap();
        let twice = filter_region(once.clone(), &columns(), &region).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_absent_targets_give_empty_table() {
        let out = filter_region(table(), &columns(), &RegionFilter::new("X", "Y")).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns().len(), 2);
    }

    #[test]
    fn test_missing_filter_column() {
        let err = filter_eq(table(), "nope", "A").unwrap_err();
        assert!(matches!(err, Error::MissingColumn(_)));
    }

    #[test]
    fn test_exact_match_only() {
        let out = filter_eq(table(), "planning_area", "A ").unwrap();
        assert!(out.is_empty());
    }
}
