// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for pipeline runs
pub type Result<T> = std::result::Result<T, Error>;

/// First failure of a pipeline step; runs stop there
#[derive(Error, Debug)]
pub enum Error {
    #[error("Table error: {0}")]
    Core(#[from] forestmap_core::Error),

    #[error("Imagery error: {0}")]
    Imagery(#[from] forestmap_imagery::Error),

    #[error("Render error: {0}")]
    Render(#[from] forestmap_render::Error),
}
