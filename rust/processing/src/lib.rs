// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Forest parcel pipeline shared by the CLI and tests.

pub mod error;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{run, PipelineConfig, PipelineReport, PipelineStats};
