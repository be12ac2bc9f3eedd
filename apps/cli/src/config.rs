// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration loaded from environment variables.

use chrono::NaiveDate;
use forestmap_core::{ColumnSet, RegionFilter};
use forestmap_imagery::{CompositeRequest, DEFAULT_API_URL};
use forestmap_processing::PipelineConfig;
use std::path::PathBuf;
use std::str::FromStr;

/// Where composites come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageryBackend {
    /// Earth Engine REST API
    EarthEngine,
    /// Local scene directory
    Scenes,
}

impl FromStr for ImageryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earthengine" | "ee" => Ok(Self::EarthEngine),
            "scenes" | "local" => Ok(Self::Scenes),
            other => Err(format!("unknown imagery backend '{}'", other)),
        }
    }
}

/// Run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the parcel GeoJSON.
    pub input_dir: PathBuf,
    /// Interactive map output.
    pub map_path: PathBuf,
    /// Choropleth PNG output.
    pub plot_path: PathBuf,
    /// Column label set.
    pub columns: ColumnSet,
    pub planning_area: String,
    pub municipality: String,
    /// Composite window, end exclusive.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Maximum cloudy pixel percentage (exclusive).
    pub cloud_filter: f64,
    pub imagery: ImageryBackend,
    /// Scene directory for the local backend.
    pub scene_dir: PathBuf,
    pub ee_project_id: String,
    pub ee_access_token: Option<String>,
    pub ee_api_url: String,
}

fn date_var(name: &str, default: NaiveDate) -> NaiveDate {
    std::env::var(name)
        .ok()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = CompositeRequest::default();
        let region = RegionFilter::default();
        Self {
            input_dir: std::env::var("FORESTMAP_INPUT_DIR")
                .unwrap_or_else(|_| "downloads".into())
                .into(),
            map_path: std::env::var("FORESTMAP_MAP_PATH")
                .unwrap_or_else(|_| "downloads/polygon_map.html".into())
                .into(),
            plot_path: std::env::var("FORESTMAP_PLOT_PATH")
                .unwrap_or_else(|_| "downloads/volume_density.png".into())
                .into(),
            columns: std::env::var("FORESTMAP_LABELS")
                .ok()
                .and_then(|s| ColumnSet::by_name(&s))
                .unwrap_or_default(),
            planning_area: std::env::var("FORESTMAP_PLANNING_AREA").unwrap_or(region.planning_area),
            municipality: std::env::var("FORESTMAP_MUNICIPALITY").unwrap_or(region.municipality),
            start_date: date_var("FORESTMAP_START_DATE", defaults.start),
            end_date: date_var("FORESTMAP_END_DATE", defaults.end),
            cloud_filter: std::env::var("FORESTMAP_CLOUD_FILTER")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(defaults.cloud_threshold),
            imagery: std::env::var("FORESTMAP_IMAGERY")
                .unwrap_or_else(|_| "earthengine".into())
                .parse()
                .unwrap_or(ImageryBackend::EarthEngine),
            scene_dir: std::env::var("FORESTMAP_SCENE_DIR")
                .unwrap_or_else(|_| "downloads/scenes".into())
                .into(),
            ee_project_id: std::env::var("EE_PROJECT_ID").unwrap_or_else(|_| "my-project-423921".into()),
            ee_access_token: std::env::var("EE_ACCESS_TOKEN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            ee_api_url: std::env::var("EE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
        }
    }

    /// Pipeline parameters for this configuration
    pub fn pipeline(&self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            input_dir: self.input_dir.clone(),
            map_path: self.map_path.clone(),
            columns: self.columns.clone(),
            region: RegionFilter::new(self.planning_area.clone(), self.municipality.clone()),
            composite: CompositeRequest {
                start: self.start_date,
                end: self.end_date,
                cloud_threshold: self.cloud_filter,
                ..defaults.composite.clone()
            },
            ..defaults
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
