// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end runs against a temporary download directory

use chrono::NaiveDate;
use forestmap_core::{ColumnSet, RegionFilter};
use forestmap_geometry::Bounds;
use forestmap_imagery::{Scene, SceneRaster, SceneStack};
use forestmap_processing::{run, Error, PipelineConfig};
use forestmap_render::{MemorySurface, Normalize};
use image::Rgb;
use serde_json::{json, Map, Value as JsonValue};
use std::fs;
use std::path::Path;

/// Source field count, geometry excluded
const FIELDS: usize = 33;
const VOLUME: usize = 11;
const MUNICIPALITY: usize = 13;
const PLANNING_AREA: usize = 23;
const AREA: usize = 26;

fn feature(planning_area: &str, municipality: &str, volume: f64, area: f64, x0: f64) -> JsonValue {
    let mut properties = Map::new();
    for i in 0..FIELDS {
        let value = match i {
            VOLUME => json!(volume),
            AREA => json!(area),
            PLANNING_AREA => json!(planning_area),
            MUNICIPALITY => json!(municipality),
            _ => json!(format!("f{}", i)),
        };
        properties.insert(format!("A45_{:03}", i + 1), value);
    }
    let (y0, size) = (33.5, 0.01);
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [x0, y0], [x0 + size, y0], [x0 + size, y0 + size], [x0, y0 + size], [x0, y0]
            ]]
        }
    })
}

fn write_parcels(dir: &Path, features: Vec<JsonValue>) {
    let collection = json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::4612" } },
        "features": features,
    });
    fs::write(dir.join("A45-19_39.geojson"), collection.to_string()).unwrap();
}

fn scenes() -> SceneStack {
    let footprint = Bounds::from_corners(133.9, 33.4, 134.2, 33.6);
    let scene = |id: &str, value: u16| Scene {
        id: id.to_string(),
        date: NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
        cloudy_pixel_percentage: 5.0,
        bounds: footprint,
        bands: vec!["B4".into(), "B3".into(), "B2".into()],
        raster: SceneRaster::from_pixel(16, 16, Rgb([value, value, value])),
    };
    SceneStack::new(vec![scene("a", 500), scene("b", 1500), scene("c", 2500)]).with_output_width(32)
}

fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        input_dir: dir.to_path_buf(),
        map_path: dir.join("out").join("polygon_map.html"),
        ..PipelineConfig::default()
    }
}

#[test]
fn test_full_run() {
    let dir = tempfile::tempdir().unwrap();
    write_parcels(
        dir.path(),
        vec![
            feature("安芸", "北川村", 100.0, 20.0, 134.00),
            feature("安芸", "北川村", 300.0, 10.0, 134.02),
            feature("安芸", "北川村", 50.0, 0.0, 134.04),
            feature("安芸", "馬路村", 80.0, 4.0, 134.06),
            feature("高知", "北川村", 80.0, 4.0, 134.08),
        ],
    );

    let mut surface = MemorySurface::new();
    let report = run(&config(dir.path()), &scenes(), &mut surface).unwrap();

    assert_eq!(report.loaded_rows, 5);
    assert_eq!(report.region_rows, 3);
    // zero area parcel has an infinite density and is not drawn
    assert_eq!(report.plotted, 2);
    assert_eq!(report.columns.len(), 34 - 17 + 1);
    assert_eq!(report.columns.last().map(String::as_str), Some("材積/ha"));

    let figure = surface.last.unwrap();
    let legend = figure.legend.unwrap();
    assert_eq!(legend.norm, Normalize::new(5.0, 30.0));
    assert_eq!(legend.label, "Timber Volumes /ha");

    let html = fs::read_to_string(&report.map_path).unwrap();
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("\"Sentinel-2 RGB\""));
    assert!(html.contains("\"GeoJSON Data\""));
    assert!(html.contains("北川村"));
    assert!(!html.contains("馬路村"));
}

#[test]
fn test_region_without_parcels() {
    let dir = tempfile::tempdir().unwrap();
    write_parcels(dir.path(), vec![feature("高知", "馬路村", 1.0, 1.0, 134.0)]);

    let mut surface = MemorySurface::new();
    let report = run(&config(dir.path()), &scenes(), &mut surface).unwrap();

    assert_eq!(report.region_rows, 0);
    assert_eq!(report.plotted, 0);
    assert!(report.map_path.exists());
    assert!(surface.last.unwrap().legend.is_none());
}

#[test]
fn test_english_labels_and_custom_region() {
    let dir = tempfile::tempdir().unwrap();
    write_parcels(dir.path(), vec![feature("X", "Y", 10.0, 5.0, 134.0)]);

    let config = PipelineConfig {
        columns: ColumnSet::english(),
        region: RegionFilter::new("X", "Y"),
        ..config(dir.path())
    };
    let mut surface = MemorySurface::new();
    let report = run(&config, &scenes(), &mut surface).unwrap();

    assert_eq!(report.plotted, 1);
    assert!(report.columns.contains(&"Timber Volume/ha".to_string()));
}

#[test]
fn test_schema_mismatch_stops_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut short = feature("安芸", "北川村", 1.0, 1.0, 134.0);
    short["properties"].as_object_mut().unwrap().remove("A45_033");
    write_parcels(dir.path(), vec![short]);

    let mut surface = MemorySurface::new();
    let err = run(&config(dir.path()), &scenes(), &mut surface).unwrap_err();
    assert!(matches!(err, Error::Core(forestmap_core::Error::SchemaMismatch { .. })));
    assert!(surface.last.is_none());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut surface = MemorySurface::new();
    let err = run(&config(dir.path()), &scenes(), &mut surface).unwrap_err();
    assert!(matches!(err, Error::Core(forestmap_core::Error::NoGeoJson(_))));
}
