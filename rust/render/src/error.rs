// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for rendering
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while drawing or presenting a plot
#[derive(Error, Debug)]
pub enum Error {
    #[error("Table error: {0}")]
    Core(#[from] forestmap_core::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
