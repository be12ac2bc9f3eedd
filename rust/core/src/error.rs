// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for table operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or transforming parcel tables
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema mismatch: {expected} labels for {actual} columns")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row} has {actual} cells, table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Geometry column {index} is out of range for {columns} columns")]
    GeometryIndex { index: usize, columns: usize },

    #[error("Column has {actual} values, table has {expected} rows")]
    ColumnLength { expected: usize, actual: usize },

    #[error("Non-numeric value {value:?} in column {column} at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("No .geojson file found in {0}")]
    NoGeoJson(PathBuf),

    #[error("Expected a FeatureCollection, found {0}")]
    NotFeatureCollection(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] forestmap_geometry::Error),
}
