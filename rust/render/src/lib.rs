// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # forestmap render
//!
//! Static choropleth figures of parcel tables.
//!
//! ```rust,ignore
//! use forestmap_render::{render_choropleth, ChoroplethStyle, PngSurface, Surface};
//!
//! let figure = render_choropleth(parcels, "材積/ha", &ChoroplethStyle::default())?;
//! PngSurface::new("downloads/volume_density.png").present(&figure)?;
//! ```

pub mod choropleth;
pub mod colormap;
pub mod error;
pub mod raster;
pub mod surface;
pub mod text;

pub use choropleth::{drop_unplottable, render_choropleth, Choropleth, ChoroplethStyle, Legend};
pub use colormap::{Colormap, Normalize};
pub use error::{Error, Result};
pub use surface::{MemorySurface, PngSurface, Surface};
