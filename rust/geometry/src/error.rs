// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or transforming parcel geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}
