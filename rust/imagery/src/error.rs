// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for imagery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while composing imagery or writing map documents
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Imagery service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid authorization header: {0}")]
    InvalidHeader(String),

    #[error("No scenes match the request ({available} available)")]
    NoScenes { available: usize },

    #[error("Invalid scene {id}: {reason}")]
    InvalidScene { id: String, reason: String },

    #[error("Scene {scene} has no band {band}")]
    MissingBand { scene: String, band: String },

    #[error("Composites take three bands, {0} requested")]
    BandCount(usize),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
