// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composite requests

use chrono::NaiveDate;
use forestmap_core::Table;
use forestmap_geometry::{Bounds, Polygon};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Sentinel-2 surface reflectance, harmonized processing baseline
pub const DEFAULT_COLLECTION: &str = "COPERNICUS/S2_SR_HARMONIZED";

/// Scene property holding the cloudy pixel share in percent
pub const CLOUD_PROPERTY: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Band selection and stretch of a rendered composite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisParams {
    pub bands: Vec<String>,
    pub min: f64,
    pub max: f64,
}

impl Default for VisParams {
    /// True colour: red, green, blue
    fn default() -> Self {
        Self {
            bands: vec!["B4".into(), "B3".into(), "B2".into()],
            min: 0.0,
            max: 3000.0,
        }
    }
}

impl VisParams {
    /// Stretch a raw value to 8 bits
    pub fn stretch(&self, value: f64) -> u8 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return if value > self.min { 255 } else { 0 };
        }
        ((value - self.min) / span * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// A median composite over a date window, filtered by cloud cover and
/// clipped to a region
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRequest {
    pub collection: String,
    /// First day of the window, inclusive
    pub start: NaiveDate,
    /// Day after the window, exclusive
    pub end: NaiveDate,
    /// Scenes must be strictly below this cloudy percentage
    pub cloud_threshold: f64,
    pub vis: VisParams,
    /// Clip region, coordinates in longitude/latitude
    pub region: Vec<Polygon>,
}

impl Default for CompositeRequest {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            start: NaiveDate::from_ymd_opt(2022, 4, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2022, 11, 1).unwrap_or(NaiveDate::MIN),
            cloud_threshold: 20.0,
            vis: VisParams::default(),
            region: Vec::new(),
        }
    }
}

impl CompositeRequest {
    /// Use every parcel polygon of `table` as the clip region
    pub fn with_region(mut self, table: &Table) -> Self {
        self.region = (0..table.len())
            .filter_map(|row| table.geometry(row))
            .flat_map(|g| g.polygons().iter().cloned())
            .collect();
        self
    }

    /// Bounds of the clip region, invalid when the region is empty
    pub fn region_bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        for p in self.region.iter().flat_map(|polygon| polygon.exterior.iter()) {
            bounds.expand(p.x, p.y);
        }
        bounds
    }

    pub fn region_contains(&self, p: &Point2<f64>) -> bool {
        self.region.iter().any(|polygon| polygon.contains(p))
    }

    /// Acquisition date inside `[start, end)`
    pub fn in_window(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn accepts_cloud(&self, cloudy_percentage: f64) -> bool {
        cloudy_percentage < self.cloud_threshold
    }
}
