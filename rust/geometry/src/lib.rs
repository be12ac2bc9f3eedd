// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! forestmap geometry
//!
//! Parcel polygons, validity checks, bounds and coordinate reference
//! systems. Coordinates are `nalgebra::Point2<f64>` with `x` as
//! longitude (or easting) and `y` as latitude (or northing).

pub mod bounds;
pub mod convert;
pub mod crs;
pub mod error;
pub mod polygon;
pub mod validity;

// Re-export nalgebra types for convenience
pub use nalgebra::Point2;

pub use bounds::Bounds;
pub use convert::{from_geojson, to_geojson};
pub use crs::Crs;
pub use error::{Error, Result};
pub use polygon::{Geometry, Polygon};
pub use validity::{validate, ValidityProblem};
