// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Result;
use crate::request::CompositeRequest;
use forestmap_geometry::Bounds;

/// A composite ready to be shown on a map
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeLayer {
    /// XYZ tile service, `{z}`, `{x}` and `{y}` placeholders
    Tiles {
        url_template: String,
        attribution: String,
    },
    /// Encoded PNG spanning `bounds` (longitude/latitude)
    Image { png: Vec<u8>, bounds: Bounds },
}

/// Source of median composites
pub trait ImageryService {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Build the composite described by `request`
    fn composite(&self, request: &CompositeRequest) -> Result<CompositeLayer>;
}
