// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parcel polygon types

use crate::bounds::Bounds;
use nalgebra::Point2;

/// Polygon with an exterior ring and optional holes.
///
/// Rings are stored closed (first position repeated last) as they come
/// from GeoJSON; nothing here enforces it, see [`crate::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Exterior ring
    pub exterior: Vec<Point2<f64>>,
    /// Interior rings (holes)
    pub interiors: Vec<Vec<Point2<f64>>>,
}

impl Polygon {
    /// Create a polygon without holes
    pub fn new(exterior: Vec<Point2<f64>>) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    /// Create a polygon from an exterior ring and its holes
    pub fn with_interiors(exterior: Vec<Point2<f64>>, interiors: Vec<Vec<Point2<f64>>>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Exterior followed by every interior ring
    pub fn rings(&self) -> impl Iterator<Item = &Vec<Point2<f64>>> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// Unsigned area: exterior minus holes, in squared CRS units
    pub fn area(&self) -> f64 {
        let holes: f64 = self.interiors.iter().map(|r| ring_signed_area(r).abs()).sum();
        (ring_signed_area(&self.exterior).abs() - holes).max(0.0)
    }

    /// Even-odd containment test over all rings
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        let mut inside = false;
        for ring in self.rings() {
            if ring_crossings(ring, p) % 2 == 1 {
                inside = !inside;
            }
        }
        inside
    }
}

/// Parcel geometry. A45 sub-compartments are polygons or multipolygons.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    /// All member polygons
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(p) => std::slice::from_ref(p),
            Geometry::MultiPolygon(ps) => ps,
        }
    }

    /// True when the geometry has no positions at all
    pub fn is_empty(&self) -> bool {
        self.polygons().iter().all(|p| p.exterior.is_empty())
    }

    /// Bounding box of every position
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::new();
        for polygon in self.polygons() {
            for ring in polygon.rings() {
                for p in ring {
                    bounds.expand(p.x, p.y);
                }
            }
        }
        bounds
    }

    /// Sum of member polygon areas
    pub fn area(&self) -> f64 {
        self.polygons().iter().map(Polygon::area).sum()
    }

    /// True if any member polygon contains the point
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        self.polygons().iter().any(|poly| poly.contains(p))
    }

    /// Apply a coordinate function to every position
    pub fn map_coords<F>(&self, mut f: F) -> Geometry
    where
        F: FnMut(&Point2<f64>) -> Point2<f64>,
    {
        let mut map_polygon = |poly: &Polygon| Polygon {
            exterior: poly.exterior.iter().map(&mut f).collect(),
            interiors: poly
                .interiors
                .iter()
                .map(|ring| ring.iter().map(&mut f).collect())
                .collect(),
        };
        match self {
            Geometry::Polygon(p) => Geometry::Polygon(map_polygon(p)),
            Geometry::MultiPolygon(ps) => Geometry::MultiPolygon(ps.iter().map(map_polygon).collect()),
        }
    }
}

/// Signed ring area (shoelace). Positive for counter-clockwise rings.
pub fn ring_signed_area(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Number of ring edges crossed by a ray cast from `p` towards +x
fn ring_crossings(ring: &[Point2<f64>], p: &Point2<f64>) -> usize {
    if ring.len() < 3 {
        return 0;
    }
    let mut crossings = 0;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                crossings += 1;
            }
        }
        j = i;
    }
    crossings
}
