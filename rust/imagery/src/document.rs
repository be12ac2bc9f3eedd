// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interactive map documents
//!
//! A self-contained Leaflet page with an OpenStreetMap base layer, the
//! composite imagery and the parcel GeoJSON, plus a layer switcher.

use crate::error::Result;
use crate::request::CompositeRequest;
use crate::service::{CompositeLayer, ImageryService};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use forestmap_core::Table;
use forestmap_geometry::Bounds;
use std::fs;
use std::path::{Path, PathBuf};

const LEAFLET_VERSION: &str = "1.9.4";

/// Centre and zoom used when there is nothing to show
const WORLD_CENTER: (f64, f64) = (20.0, 0.0);
const WORLD_ZOOM: u8 = 2;

/// Zoom used when centring on parcels
pub const PARCEL_ZOOM: u8 = 12;

pub const COMPOSITE_LAYER_NAME: &str = "Sentinel-2 RGB";
pub const PARCEL_LAYER_NAME: &str = "GeoJSON Data";

/// Layers and view of one interactive map
#[derive(Debug, Clone)]
pub struct MapDocument {
    /// `(lat, lon)`
    pub center: (f64, f64),
    pub zoom: u8,
    pub composite: Option<CompositeLayer>,
    pub parcels: geojson::FeatureCollection,
}

impl MapDocument {
    /// Centre on `bounds` at parcel zoom, or show the world when empty
    pub fn new(parcels: geojson::FeatureCollection, bounds: &Bounds) -> Self {
        let (center, zoom) = match bounds.center() {
            Some((lon, lat)) => ((lat, lon), PARCEL_ZOOM),
            None => (WORLD_CENTER, WORLD_ZOOM),
        };
        Self {
            center,
            zoom,
            composite: None,
            parcels,
        }
    }

    pub fn with_composite(mut self, layer: CompositeLayer) -> Self {
        self.composite = Some(layer);
        self
    }

    /// HTML text of the page
    pub fn to_html(&self) -> Result<String> {
        // "</" would close the script element early
        let parcels = serde_json::to_string(&self.parcels)?.replace("</", "<\\/");
        let composite = match &self.composite {
            Some(layer) => composite_script(layer)?,
            None => String::new(),
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{parcel_name}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{lat}, {lon}], {zoom});
var base = L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
var overlays = {{}};
{composite}var parcels = L.geoJSON({parcels}).addTo(map);
overlays[{parcel_key}] = parcels;
L.control.layers({{"OpenStreetMap": base}}, overlays).addTo(map);
</script>
</body>
</html>
"#,
            version = LEAFLET_VERSION,
            parcel_name = PARCEL_LAYER_NAME,
            parcel_key = js_string(PARCEL_LAYER_NAME)?,
            lat = self.center.0,
            lon = self.center.1,
            zoom = self.zoom,
            composite = composite,
            parcels = parcels,
        ))
    }

    /// Write the page, creating the parent directory
    pub fn write(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_html()?)?;
        Ok(path.to_path_buf())
    }
}

fn js_string(text: &str) -> Result<String> {
    Ok(serde_json::to_string(text)?)
}

fn composite_script(layer: &CompositeLayer) -> Result<String> {
    let name = js_string(COMPOSITE_LAYER_NAME)?;
    let script = match layer {
        CompositeLayer::Tiles {
            url_template,
            attribution,
        } => format!(
            "var composite = L.tileLayer({}, {{attribution: {}}}).addTo(map);\noverlays[{}] = composite;\n",
            js_string(url_template)?,
            js_string(attribution)?,
            name
        ),
        CompositeLayer::Image { png, bounds } => format!(
            "var composite = L.imageOverlay(\"data:image/png;base64,{}\", [[{}, {}], [{}, {}]]).addTo(map);\noverlays[{}] = composite;\n",
            BASE64.encode(png),
            bounds.min_y,
            bounds.min_x,
            bounds.max_y,
            bounds.max_x,
            name
        ),
    };
    Ok(script)
}

/// Build the interactive map of `table` and write it to `path`.
///
/// The composite is requested for the table's parcels; an empty table
/// skips the request and produces a page without imagery. Service errors
/// are returned as-is.
pub fn compose_map(
    table: &Table,
    service: &dyn ImageryService,
    request: &CompositeRequest,
    path: &Path,
) -> Result<PathBuf> {
    let request = request.clone().with_region(table);
    let bounds = request.region_bounds();
    let mut document = MapDocument::new(table.to_feature_collection(), &bounds);

    if request.region.is_empty() {
        tracing::warn!("No parcels in region, map written without imagery");
    } else {
        tracing::debug!(
            service = service.name(),
            polygons = request.region.len(),
            start = %request.start,
            end = %request.end,
            cloud_threshold = request.cloud_threshold,
            "Requesting composite"
        );
        document = document.with_composite(service.composite(&request)?);
    }

    let written = document.write(path)?;
    tracing::info!(path = %written.display(), parcels = table.len(), "Wrote interactive map");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use forestmap_core::Value;
    use forestmap_geometry::{Crs, Geometry, Polygon};
    use nalgebra::Point2;

    struct FixedTiles;

    impl ImageryService for FixedTiles {
        fn name(&self) -> &str {
            "fixed"
        }

        fn composite(&self, _request: &CompositeRequest) -> Result<CompositeLayer> {
            Ok(CompositeLayer::Tiles {
                url_template: "https://tiles.test/maps/x/tiles/{z}/{x}/{y}".into(),
                attribution: "test".into(),
            })
        }
    }

    struct Unavailable;

    impl ImageryService for Unavailable {
        fn name(&self) -> &str {
            "down"
        }

        fn composite(&self, _request: &CompositeRequest) -> Result<CompositeLayer> {
            Err(Error::Status {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    fn parcels() -> Table {
        let mut table = Table::new(vec!["name".into(), "geometry".into()], Some(1), Crs::Jgd2011).unwrap();
        let square = Polygon::new(vec![
            Point2::new(134.0, 33.0),
            Point2::new(134.5, 33.0),
            Point2::new(134.5, 33.5),
            Point2::new(134.0, 33.5),
            Point2::new(134.0, 33.0),
        ]);
        table
            .push_row(vec![Value::from("</script>"), Geometry::Polygon(square).into()])
            .unwrap();
        table
    }

    #[test]
    fn test_document_has_layers_and_center() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("polygon_map.html");
        compose_map(&parcels(), &FixedTiles, &CompositeRequest::default(), &path).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("https://tiles.test/maps/x/tiles/{z}/{x}/{y}"));
        assert!(html.contains("\"Sentinel-2 RGB\""));
        assert!(html.contains("\"GeoJSON Data\""));
        assert!(html.contains("setView([33.25, 134.25], 12)"));
        assert!(html.contains("FeatureCollection"));
        assert!(!html.contains("\"</script>\""));
    }

    #[test]
    fn test_image_overlay() {
        let doc = MapDocument::new(parcels().to_feature_collection(), &Bounds::from_corners(0.0, 1.0, 2.0, 3.0))
            .with_composite(CompositeLayer::Image {
                png: vec![1, 2, 3],
                bounds: Bounds::from_corners(0.0, 1.0, 2.0, 3.0),
            });
        let html = doc.to_html().unwrap();
        assert!(html.contains("data:image/png;base64,AQID"));
        assert!(html.contains("[[1, 0], [3, 2]]"));
    }

    #[test]
    fn test_empty_region_skips_imagery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        let empty = parcels().retain(|_| false);
        compose_map(&empty, &Unavailable, &CompositeRequest::default(), &path).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("setView([20, 0], 2)"));
        assert!(!html.contains("var composite"));
    }

    #[test]
    fn test_service_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        let err = compose_map(&parcels(), &Unavailable, &CompositeRequest::default(), &path).unwrap_err();
        assert!(matches!(err, Error::Status { status: 503, .. }));
        assert!(!path.exists());
    }
}
