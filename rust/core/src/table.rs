// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parcel table
//!
//! A small row-oriented table with one geometry column. Every
//! transformation consumes the table and returns a new one; nothing is
//! written back to the source file.

use crate::error::{Error, Result};
use crate::value::Value;
use forestmap_geometry::{Crs, Geometry};
use rustc_hash::FxHashSet;

/// Rows of parcels with ordered, labelled columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    geometry_index: Option<usize>,
    crs: Crs,
}

impl Table {
    /// Create an empty table; `geometry_index` must name one of `columns`
    pub fn new(columns: Vec<String>, geometry_index: Option<usize>, crs: Crs) -> Result<Self> {
        if let Some(index) = geometry_index {
            if index >= columns.len() {
                return Err(Error::GeometryIndex {
                    index,
                    columns: columns.len(),
                });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
            geometry_index,
            crs,
        })
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[inline]
    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (rows, columns), geometry column included
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Label of the geometry column
    pub fn geometry_column(&self) -> Option<&str> {
        self.geometry_index.and_then(|i| self.columns.get(i)).map(String::as_str)
    }

    /// Position of a column by label
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Cells of one column in row order
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Single cell by row index and column label
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Geometry of a row, `None` if missing or there is no geometry column
    pub fn geometry(&self, row: usize) -> Option<&Geometry> {
        let idx = self.geometry_index?;
        self.rows.get(row)?.get(idx)?.as_geometry()
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
            geometry_index: self.geometry_index,
            crs: self.crs,
        }
    }

    /// Distinct values of a column in order of first appearance
    pub fn unique_values(&self, name: &str) -> Result<Vec<Value>> {
        let mut seen = FxHashSet::default();
        let mut unique = Vec::new();
        for value in self.column(name)? {
            // NaN != NaN, so key on the debug form
            if seen.insert(format!("{:?}", value)) {
                unique.push(value.clone());
            }
        }
        Ok(unique)
    }

    /// Keep the rows for which `keep` returns true
    pub fn retain<F>(mut self, mut keep: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Replace the labels positionally. Order, cells and the geometry
    /// column position are unchanged.
    pub fn rename_columns<S: AsRef<str>>(mut self, labels: &[S]) -> Result<Table> {
        if labels.len() != self.columns.len() {
            return Err(Error::SchemaMismatch {
                expected: labels.len(),
                actual: self.columns.len(),
            });
        }
        self.columns = labels.iter().map(|l| l.as_ref().to_string()).collect();
        Ok(self)
    }

    /// Remove the named columns. Every name must exist.
    pub fn drop_columns<S: AsRef<str>>(mut self, names: &[S]) -> Result<Table> {
        let mut drop = vec![false; self.columns.len()];
        for name in names {
            drop[self.column_index(name.as_ref())?] = true;
        }

        let geometry_index = self.geometry_index.and_then(|g| {
            if drop[g] {
                None
            } else {
                Some(g - drop[..g].iter().filter(|d| **d).count())
            }
        });

        self.columns = self
            .columns
            .into_iter()
            .zip(&drop)
            .filter(|(_, d)| !**d)
            .map(|(c, _)| c)
            .collect();
        for row in &mut self.rows {
            let cells = std::mem::take(row);
            *row = cells
                .into_iter()
                .zip(&drop)
                .filter(|(_, d)| !**d)
                .map(|(v, _)| v)
                .collect();
        }
        self.geometry_index = geometry_index;
        Ok(self)
    }

    /// Append a column, replacing an existing one with the same label
    pub fn with_column(mut self, name: &str, values: Vec<Value>) -> Result<Table> {
        if values.len() != self.rows.len() {
            return Err(Error::ColumnLength {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(self)
    }

    /// Reproject every geometry into `target`
    pub fn to_crs(mut self, target: Crs) -> Table {
        if let Some(idx) = self.geometry_index {
            for row in &mut self.rows {
                if let Value::Geometry(g) = &row[idx] {
                    row[idx] = Value::Geometry(self.crs.transform(target, g));
                }
            }
        }
        self.crs = target;
        self
    }

    /// Serialize as a GeoJSON FeatureCollection. The geometry column
    /// becomes the feature geometry, the other columns its properties.
    pub fn to_feature_collection(&self) -> geojson::FeatureCollection {
        let features = self
            .rows
            .iter()
            .map(|row| {
                let mut properties = geojson::JsonObject::new();
                let mut geometry = None;
                for (i, (name, value)) in self.columns.iter().zip(row).enumerate() {
                    if Some(i) == self.geometry_index {
                        geometry = value.as_geometry().map(forestmap_geometry::to_geojson);
                    } else {
                        properties.insert(name.clone(), value.to_json());
                    }
                }
                geojson::Feature {
                    bbox: None,
                    geometry,
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestmap_geometry::{Point2, Polygon};

    fn parcel() -> Geometry {
        Geometry::Polygon(Polygon::new(vec![
            Point2::new(134.0, 33.5),
            Point2::new(134.1, 33.5),
            Point2::new(134.1, 33.6),
            Point2::new(134.0, 33.5),
        ]))
    }

    fn sample() -> Table {
        let mut table = Table::new(
            vec!["a".into(), "b".into(), "c".into(), "geometry".into()],
            Some(3),
            Crs::Jgd2011,
        )
        .unwrap();
        table
            .push_row(vec![1i64.into(), "x".into(), 2.5.into(), parcel().into()])
            .unwrap();
        table
            .push_row(vec![2i64.into(), "y".into(), Value::Null, Value::Null])
            .unwrap();
        table
    }

    #[test]
    fn test_push_row_width_checked() {
        let mut table = sample();
        let err = table.push_row(vec![Value::Null]).unwrap_err();
        assert!(matches!(err, Error::RowWidth { expected: 4, actual: 1, .. }));
    }

    #[test]
    fn test_geometry_index_out_of_range() {
        let err = Table::new(vec!["a".into(), "b".into()], Some(5), Crs::Jgd2011).unwrap_err();
        assert!(matches!(err, Error::GeometryIndex { index: 5, columns: 2 }));

        let empty = Table::new(Vec::new(), Some(0), Crs::Jgd2011);
        assert!(matches!(empty, Err(Error::GeometryIndex { index: 0, columns: 0 })));

        let table = Table::new(vec!["a".into()], None, Crs::Jgd2011).unwrap();
        assert_eq!(table.geometry_column(), None);
        assert!(table.geometry(0).is_none());
    }

    #[test]
    fn test_rename_is_positional_bijection() {
        let before = sample();
        let after = before.clone().rename_columns(&["A", "B", "C", "geom"]).unwrap();
        assert_eq!(after.columns(), &["A", "B", "C", "geom"]);
        assert_eq!(after.rows(), before.rows());
        assert_eq!(after.geometry_column(), Some("geom"));
    }

    #[test]
    fn test_rename_count_mismatch() {
        let err = sample().rename_columns(&["A", "B"]).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { expected: 2, actual: 4 }));
    }

    #[test]
    fn test_drop_columns_keeps_others_and_geometry() {
        let table = sample().drop_columns(&["a", "c"]).unwrap();
        assert_eq!(table.columns(), &["b", "geometry"]);
        assert_eq!(table.get(0, "b"), Some(&Value::Text("x".into())));
        assert_eq!(table.geometry_column(), Some("geometry"));
        assert!(table.geometry(0).is_some());
        assert!(table.geometry(1).is_none());
    }

    #[test]
    fn test_drop_missing_column_fails() {
        let err = sample().drop_columns(&["a", "zzz"]).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(name) if name == "zzz"));
    }

    #[test]
    fn test_retain_and_unique() {
        let table = sample().retain(|row| row[1] == Value::Text("y".into()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "a"), Some(&Value::Int(2)));

        let mut dup = sample();
        dup.push_row(vec![1i64.into(), "x".into(), 2.5.into(), Value::Null]).unwrap();
        assert_eq!(
            dup.unique_values("b").unwrap(),
            vec![Value::Text("x".into()), Value::Text("y".into())]
        );
    }

    #[test]
    fn test_feature_collection_properties() {
        let fc = sample().to_feature_collection();
        assert_eq!(fc.features.len(), 2);
        let first = &fc.features[0];
        assert!(first.geometry.is_some());
        let props = first.properties.as_ref().unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(fc.features[1].geometry.is_none());
    }

    #[test]
    fn test_with_column_appends() {
        let table = sample()
            .with_column("d", vec![Value::Float(1.0), Value::Float(2.0)])
            .unwrap();
        assert_eq!(table.shape(), (2, 5));
        assert_eq!(table.get(1, "d"), Some(&Value::Float(2.0)));
    }
}
