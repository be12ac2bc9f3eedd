// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeoJSON loading
//!
//! Reads a pre-extracted FeatureCollection into a [`Table`]. Property keys
//! become columns in order of first appearance, the geometry column is
//! appended last and labelled `geometry`.

use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::Value;
use forestmap_geometry::Crs;
use geojson::GeoJson;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Label given to the geometry column on load
pub const GEOMETRY_COLUMN: &str = "geometry";

/// First `.geojson` file of a directory in name order
pub fn find_geojson(dir: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_geojson = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("geojson"))
            .unwrap_or(false);
        if path.is_file() && is_geojson {
            candidates.push(path);
        }
    }
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoGeoJson(dir.to_path_buf()))
}

/// Read a GeoJSON file into a table in its declared CRS
pub fn read_geojson(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)?;
    parse_geojson(&content)
}

/// Parse GeoJSON text into a table in its declared CRS
pub fn parse_geojson(content: &str) -> Result<Table> {
    let collection = match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(Error::NotFeatureCollection("Feature")),
        GeoJson::Geometry(_) => return Err(Error::NotFeatureCollection("Geometry")),
    };

    let crs = declared_crs(collection.foreign_members.as_ref())?;

    let mut columns: Vec<String> = Vec::new();
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    for feature in &collection.features {
        if let Some(properties) = &feature.properties {
            for key in properties.keys() {
                if !positions.contains_key(key) {
                    positions.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
        }
    }
    let geometry_index = columns.len();
    columns.push(GEOMETRY_COLUMN.to_string());

    let width = columns.len();
    let mut table = Table::new(columns, Some(geometry_index), crs)?;
    for feature in &collection.features {
        let mut row = vec![Value::Null; width];
        if let Some(properties) = &feature.properties {
            for (key, value) in properties {
                row[positions[key]] = Value::from_json(value);
            }
        }
        if let Some(geometry) = &feature.geometry {
            row[geometry_index] = Value::Geometry(forestmap_geometry::from_geojson(geometry)?);
        }
        table.push_row(row)?;
    }
    Ok(table)
}

/// Find, read and reproject the parcel file of a directory
pub fn load(dir: &Path, target: Crs) -> Result<(PathBuf, Table)> {
    let path = find_geojson(dir)?;
    let table = read_geojson(&path)?.to_crs(target);
    Ok((path, table))
}

/// CRS named by a GeoJSON 2008 `crs` member; CRS84 when absent
fn declared_crs(foreign_members: Option<&geojson::JsonObject>) -> Result<Crs> {
    let name = foreign_members
        .and_then(|m| m.get("crs"))
        .and_then(|crs| crs.get("properties"))
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str());
    match name {
        Some(name) => Ok(name.parse::<Crs>()?),
        None => Ok(Crs::Wgs84),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::4612" } },
        "features": [
            {
                "type": "Feature",
                "properties": { "A45_001": "x", "A45_002": 10 },
                "geometry": { "type": "Polygon", "coordinates": [[[134.0, 33.5], [134.1, 33.5], [134.1, 33.6], [134.0, 33.5]]] }
            },
            {
                "type": "Feature",
                "properties": { "A45_001": "y", "A45_003": 2.5 },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_columns_in_first_appearance_order() {
        let table = parse_geojson(SAMPLE).unwrap();
        assert_eq!(table.columns(), &["A45_001", "A45_002", "A45_003", "geometry"]);
        assert_eq!(table.crs(), Crs::Jgd2000);
        assert_eq!(table.get(0, "A45_003"), Some(&Value::Null));
        assert_eq!(table.get(1, "A45_003"), Some(&Value::Float(2.5)));
        assert!(table.geometry(0).is_some());
        assert!(table.geometry(1).is_none());
    }

    #[test]
    fn test_bare_geometry_rejected() {
        let err = parse_geojson(r#"{"type":"Point","coordinates":[1.0,2.0]}"#).unwrap_err();
        assert!(matches!(err, Error::NotFeatureCollection("Geometry")));
    }

    #[test]
    fn test_find_first_geojson_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.geojson", "a.geojson", "notes.txt"] {
            let mut f = fs::File::create(dir.path().join(name)).unwrap();
            f.write_all(SAMPLE.as_bytes()).unwrap();
        }
        let found = find_geojson(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "a.geojson");

        let (_, table) = load(dir.path(), Crs::Jgd2011).unwrap();
        assert_eq!(table.crs(), Crs::Jgd2011);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_no_geojson_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(find_geojson(dir.path()), Err(Error::NoGeoJson(_))));
    }
}
