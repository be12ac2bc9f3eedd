// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between GeoJSON geometry values and parcel geometry

use crate::error::{Error, Result};
use crate::polygon::{Geometry, Polygon};
use nalgebra::Point2;

/// Convert a GeoJSON geometry. Only (multi)polygons are parcels.
pub fn from_geojson(geometry: &geojson::Geometry) -> Result<Geometry> {
    match &geometry.value {
        geojson::Value::Polygon(rings) => Ok(Geometry::Polygon(polygon_from_rings(rings)?)),
        geojson::Value::MultiPolygon(polygons) => Ok(Geometry::MultiPolygon(
            polygons
                .iter()
                .map(|rings| polygon_from_rings(rings))
                .collect::<Result<Vec<_>>>()?,
        )),
        other => Err(Error::UnsupportedGeometry(type_name(other).to_string())),
    }
}

/// Convert parcel geometry back to a GeoJSON geometry
pub fn to_geojson(geometry: &Geometry) -> geojson::Geometry {
    let value = match geometry {
        Geometry::Polygon(p) => geojson::Value::Polygon(polygon_to_rings(p)),
        Geometry::MultiPolygon(ps) => {
            geojson::Value::MultiPolygon(ps.iter().map(polygon_to_rings).collect())
        }
    };
    geojson::Geometry::new(value)
}

fn type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon> {
    let mut rings = rings.iter().map(|r| ring_from_positions(r));
    let exterior = match rings.next() {
        Some(ring) => ring?,
        None => Vec::new(),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::with_interiors(exterior, interiors))
}

fn ring_from_positions(positions: &[Vec<f64>]) -> Result<Vec<Point2<f64>>> {
    positions
        .iter()
        .map(|pos| match pos.as_slice() {
            [x, y, ..] => Ok(Point2::new(*x, *y)),
            _ => Err(Error::InvalidCoordinates(format!(
                "position has {} ordinates, expected at least 2",
                pos.len()
            ))),
        })
        .collect()
}

fn polygon_to_rings(polygon: &Polygon) -> Vec<Vec<Vec<f64>>> {
    polygon
        .rings()
        .map(|ring| ring.iter().map(|p| vec![p.x, p.y]).collect())
        .collect()
}
