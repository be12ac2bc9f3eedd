// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate reference systems
//!
//! Only the systems the A45 forest datasets and web maps use are
//! supported. JGD2000, JGD2011 and WGS84 are all realisations of ITRF on
//! the GRS80/WGS84 ellipsoid; their coordinate offsets are far below map
//! precision, so converting between them keeps longitude/latitude as is.

use crate::error::{Error, Result};
use crate::polygon::Geometry;
use nalgebra::Point2;
use std::fmt;
use std::str::FromStr;

/// Spherical Mercator radius (EPSG:3857)
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Supported coordinate reference systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// WGS 84 geographic (EPSG:4326, OGC CRS84)
    Wgs84,
    /// JGD2000 geographic (EPSG:4612)
    Jgd2000,
    /// JGD2011 geographic (EPSG:6668)
    Jgd2011,
    /// WGS 84 / Pseudo-Mercator (EPSG:3857)
    WebMercator,
}

impl Crs {
    /// EPSG code
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Jgd2000 => 4612,
            Crs::Jgd2011 => 6668,
            Crs::WebMercator => 3857,
        }
    }

    /// Look up a CRS by EPSG code
    pub fn from_epsg(code: u32) -> Result<Self> {
        match code {
            4326 => Ok(Crs::Wgs84),
            4612 => Ok(Crs::Jgd2000),
            6668 => Ok(Crs::Jgd2011),
            3857 | 900913 => Ok(Crs::WebMercator),
            other => Err(Error::UnsupportedCrs(format!("EPSG:{}", other))),
        }
    }

    /// Longitude/latitude system
    #[inline]
    pub fn is_geographic(&self) -> bool {
        !matches!(self, Crs::WebMercator)
    }

    /// Transform a single position into `target`
    pub fn transform_point(&self, target: Crs, p: &Point2<f64>) -> Point2<f64> {
        if *self == target {
            return *p;
        }
        let geographic = if self.is_geographic() {
            *p
        } else {
            mercator_to_lonlat(p)
        };
        if target.is_geographic() {
            geographic
        } else {
            lonlat_to_mercator(&geographic)
        }
    }

    /// Transform every position of a geometry into `target`
    pub fn transform(&self, target: Crs, geometry: &Geometry) -> Geometry {
        if *self == target {
            return geometry.clone();
        }
        geometry.map_coords(|p| self.transform_point(target, p))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for Crs {
    type Err = Error;

    /// Accepts `EPSG:6668`, `urn:ogc:def:crs:EPSG::6668`,
    /// `urn:ogc:def:crs:EPSG:6.6:6668`, `urn:ogc:def:crs:OGC:1.3:CRS84`
    /// and a bare code.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.to_ascii_uppercase().ends_with("CRS84") {
            return Ok(Crs::Wgs84);
        }
        let code = name.rsplit(':').next().unwrap_or(name);
        code.parse::<u32>()
            .map_err(|_| Error::UnsupportedCrs(name.to_string()))
            .and_then(Crs::from_epsg)
    }
}

fn lonlat_to_mercator(p: &Point2<f64>) -> Point2<f64> {
    let lat = p.y.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = EARTH_RADIUS * p.x.to_radians();
    let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    Point2::new(x, y)
}

fn mercator_to_lonlat(p: &Point2<f64>) -> Point2<f64> {
    let lon = (p.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (p.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    Point2::new(lon, lat)
}
