// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Offline median composites from local scenes
//!
//! A scene directory holds one JSON sidecar per scene next to a 16-bit
//! three-channel PNG. `bands` names the channels in order and defaults to
//! `["B4", "B3", "B2"]`:
//!
//! ```json
//! {
//!   "id": "S2B_20220517",
//!   "date": "2022-05-17",
//!   "cloudy_pixel_percentage": 3.2,
//!   "bounds": { "min_x": 133.9, "min_y": 33.4, "max_x": 134.3, "max_y": 33.8 },
//!   "bands": ["B4", "B3", "B2"],
//!   "image": "S2B_20220517.png"
//! }
//! ```
//!
//! The requested `vis.bands` pick and order the output channels; a scene
//! lacking one of them fails the composite.

use crate::error::{Error, Result};
use crate::request::{CompositeRequest, VisParams};
use crate::service::{CompositeLayer, ImageryService};
use chrono::NaiveDate;
use forestmap_geometry::Bounds;
use image::{ImageBuffer, ImageFormat, Rgb, Rgba, RgbaImage};
use nalgebra::Point2;
use serde::Deserialize;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// 16-bit RGB raster
pub type SceneRaster = ImageBuffer<Rgb<u16>, Vec<u16>>;

const DEFAULT_OUTPUT_WIDTH: u32 = 512;
const MAX_ASPECT: f64 = 8.0;

#[derive(Debug, Deserialize)]
struct SceneSidecar {
    id: String,
    date: NaiveDate,
    cloudy_pixel_percentage: f64,
    bounds: Bounds,
    #[serde(default = "true_colour_bands")]
    bands: Vec<String>,
    image: String,
}

fn true_colour_bands() -> Vec<String> {
    VisParams::default().bands
}

/// One acquisition
#[derive(Debug, Clone)]
pub struct Scene {
    pub id: String,
    pub date: NaiveDate,
    pub cloudy_pixel_percentage: f64,
    /// Footprint in longitude/latitude, raster rows run north to south
    pub bounds: Bounds,
    /// Band name of each raster channel
    pub bands: Vec<String>,
    pub raster: SceneRaster,
}

impl Scene {
    /// Raw band values at a geographic position, `None` outside the footprint
    pub fn sample(&self, p: &Point2<f64>) -> Option<[u16; 3]> {
        if !self.bounds.contains(p.x, p.y) {
            return None;
        }
        let (w, h) = self.raster.dimensions();
        if w == 0 || h == 0 {
            return None;
        }
        let fx = (p.x - self.bounds.min_x) / self.bounds.width().max(f64::EPSILON);
        let fy = (self.bounds.max_y - p.y) / self.bounds.height().max(f64::EPSILON);
        let col = ((fx * w as f64) as u32).min(w - 1);
        let row = ((fy * h as f64) as u32).min(h - 1);
        Some(self.raster.get_pixel(col, row).0)
    }

    /// Raster channel of each requested band
    pub fn channels(&self, bands: &[String]) -> Result<[usize; 3]> {
        if bands.len() != 3 {
            return Err(Error::BandCount(bands.len()));
        }
        let mut channels = [0; 3];
        for (slot, band) in channels.iter_mut().zip(bands) {
            *slot = self
                .bands
                .iter()
                .take(3)
                .position(|b| b == band)
                .ok_or_else(|| Error::MissingBand {
                    scene: self.id.clone(),
                    band: band.clone(),
                })?;
        }
        Ok(channels)
    }
}

/// Local imagery service computing per-pixel medians
#[derive(Debug, Clone)]
pub struct SceneStack {
    scenes: Vec<Scene>,
    output_width: u32,
}

impl SceneStack {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self {
            scenes,
            output_width: DEFAULT_OUTPUT_WIDTH,
        }
    }

    /// Width in pixels of composed images, height follows the region
    pub fn with_output_width(mut self, width: u32) -> Self {
        self.output_width = width.max(1);
        self
    }

    /// Load every `*.json` sidecar of a directory, in name order
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut sidecars: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        sidecars.sort();

        let mut scenes = Vec::with_capacity(sidecars.len());
        for path in sidecars {
            let meta: SceneSidecar = serde_json::from_str(&fs::read_to_string(&path)?)?;
            if !meta.bounds.is_valid() || meta.bounds.width() <= 0.0 || meta.bounds.height() <= 0.0 {
                return Err(Error::InvalidScene {
                    id: meta.id,
                    reason: "empty footprint".to_string(),
                });
            }
            if meta.bands.len() != 3 {
                return Err(Error::InvalidScene {
                    id: meta.id,
                    reason: format!("{} band names for a three-channel image", meta.bands.len()),
                });
            }
            let raster = image::open(dir.join(&meta.image))?.into_rgb16();
            scenes.push(Scene {
                id: meta.id,
                date: meta.date,
                cloudy_pixel_percentage: meta.cloudy_pixel_percentage,
                bounds: meta.bounds,
                bands: meta.bands,
                raster,
            });
        }
        tracing::debug!(dir = %dir.display(), scenes = scenes.len(), "Loaded scene stack");
        Ok(Self::new(scenes))
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Scenes passing the date, cloud and footprint filters
    pub fn select(&self, request: &CompositeRequest) -> Vec<&Scene> {
        let region = request.region_bounds();
        self.scenes
            .iter()
            .filter(|s| request.in_window(s.date))
            .filter(|s| request.accepts_cloud(s.cloudy_pixel_percentage))
            .filter(|s| region.is_valid() && s.bounds.intersects(&region))
            .collect()
    }

    /// Median composite clipped to the request region, unencoded
    pub fn compose(&self, request: &CompositeRequest) -> Result<(RgbaImage, Bounds)> {
        let selected = self.select(request);
        if selected.is_empty() {
            return Err(Error::NoScenes {
                available: self.scenes.len(),
            });
        }

        let channels = selected
            .iter()
            .map(|scene| scene.channels(&request.vis.bands))
            .collect::<Result<Vec<_>>>()?;

        let region = request.region_bounds();
        let width = self.output_width;
        let ratio = (region.height() / region.width().max(f64::EPSILON)).clamp(1.0 / MAX_ASPECT, MAX_ASPECT);
        let height = ((width as f64 * ratio).round() as u32).max(1);

        let mut out = RgbaImage::new(width, height);
        let mut samples: [Vec<u16>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for row in 0..height {
            let lat = region.max_y - (row as f64 + 0.5) / height as f64 * region.height();
            for col in 0..width {
                let lon = region.min_x + (col as f64 + 0.5) / width as f64 * region.width();
                let p = Point2::new(lon, lat);
                if !request.region_contains(&p) {
                    continue;
                }

                for band in samples.iter_mut() {
                    band.clear();
                }
                for (scene, order) in selected.iter().zip(&channels) {
                    if let Some(px) = scene.sample(&p) {
                        for (band, channel) in samples.iter_mut().zip(order) {
                            band.push(px[*channel]);
                        }
                    }
                }
                if samples[0].is_empty() {
                    continue;
                }

                let [r, g, b] = [0, 1, 2].map(|i| request.vis.stretch(median(&mut samples[i])));
                out.put_pixel(col, row, Rgba([r, g, b, 255]));
            }
        }

        tracing::info!(
            scenes = selected.len(),
            width,
            height,
            "Composed median from local scenes"
        );
        Ok((out, region))
    }
}

impl ImageryService for SceneStack {
    fn name(&self) -> &str {
        "scenes"
    }

    fn composite(&self, request: &CompositeRequest) -> Result<CompositeLayer> {
        let (image, bounds) = self.compose(request)?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(CompositeLayer::Image { png, bounds })
    }
}

/// Median of the values; mean of the middle pair for even counts
fn median(values: &mut [u16]) -> f64 {
    values.sort_unstable();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2] as f64
    } else {
        (values[n / 2 - 1] as f64 + values[n / 2] as f64) / 2.0
    }
}
