// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # forestmap core
//!
//! Parcel tables for the A45 national forest sub-compartment data.
//!
//! - **Loading**: GeoJSON FeatureCollections into a [`Table`] with a
//!   geometry column, reprojected to JGD2011
//! - **Normalization**: positional relabeling, column drop, derived
//!   volume density
//! - **Filtering**: exact planning-area / municipality match
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forestmap_core::{filter_region, load, normalize, ColumnSet, RegionFilter};
//! use forestmap_geometry::Crs;
//!
//! let (_, table) = load("downloads".as_ref(), Crs::Jgd2011)?;
//! let columns = ColumnSet::japanese();
//! let table = normalize(table, &columns)?;
//! let parcels = filter_region(table, &columns, &RegionFilter::default())?;
//! println!("{} parcels", parcels.len());
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod table;
pub mod value;

pub use error::{Error, Result};
pub use filter::{filter_eq, filter_region, RegionFilter};
pub use loader::{find_geojson, load, parse_geojson, read_geojson, GEOMETRY_COLUMN};
pub use normalize::{normalize, with_ratio};
pub use schema::ColumnSet;
pub use table::Table;
pub use value::Value;
