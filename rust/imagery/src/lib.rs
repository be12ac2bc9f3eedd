// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # forestmap imagery
//!
//! Cloud-filtered median composites over parcel regions and the
//! interactive map documents that show them.
//!
//! Two [`ImageryService`] implementations ship:
//!
//! - [`EarthEngineClient`]: remote composites through the Earth Engine REST
//!   API, returned as XYZ tiles
//! - [`SceneStack`]: local composites from a directory of scenes
//!
//! ```rust,ignore
//! use forestmap_imagery::{compose_map, CompositeRequest, EarthEngineClient, DEFAULT_API_URL};
//!
//! let client = EarthEngineClient::new(DEFAULT_API_URL, "my-project", token)?;
//! compose_map(&parcels, &client, &CompositeRequest::default(), "downloads/polygon_map.html".as_ref())?;
//! ```

pub mod document;
pub mod earth_engine;
pub mod error;
pub mod request;
pub mod scene_stack;
pub mod service;

pub use document::{compose_map, MapDocument, COMPOSITE_LAYER_NAME, PARCEL_LAYER_NAME};
pub use earth_engine::{composite_expression, EarthEngineClient, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use request::{CompositeRequest, VisParams, CLOUD_PROPERTY, DEFAULT_COLLECTION};
pub use scene_stack::{Scene, SceneRaster, SceneStack};
pub use service::{CompositeLayer, ImageryService};
