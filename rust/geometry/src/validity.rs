// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon validity
//!
//! A simplified OGC simple-features check: rings must be closed, carry at
//! least four positions, use finite coordinates and never cross themselves
//! or another ring of the same polygon. Rings of different polygons in a
//! multipolygon are not compared against each other.

use crate::polygon::{Geometry, Polygon};
use nalgebra::Point2;
use std::fmt;

/// Epsilon for orientation tests
const EPSILON_2D: f64 = 1e-12;

/// First problem found in a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityProblem {
    /// No positions at all
    Empty,
    /// Ring with fewer than four positions
    TooFewPoints { polygon: usize, ring: usize },
    /// First and last positions differ
    Unclosed { polygon: usize, ring: usize },
    /// NaN or infinite coordinate
    NonFinite { polygon: usize, ring: usize },
    /// Ring crosses or touches itself
    SelfIntersection { polygon: usize, ring: usize },
    /// Two rings of one polygon cross
    RingCrossing { polygon: usize },
}

impl fmt::Display for ValidityProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidityProblem::Empty => write!(f, "empty geometry"),
            ValidityProblem::TooFewPoints { polygon, ring } => {
                write!(f, "polygon {} ring {} has fewer than 4 positions", polygon, ring)
            }
            ValidityProblem::Unclosed { polygon, ring } => {
                write!(f, "polygon {} ring {} is not closed", polygon, ring)
            }
            ValidityProblem::NonFinite { polygon, ring } => {
                write!(f, "polygon {} ring {} has non-finite coordinates", polygon, ring)
            }
            ValidityProblem::SelfIntersection { polygon, ring } => {
                write!(f, "polygon {} ring {} self-intersects", polygon, ring)
            }
            ValidityProblem::RingCrossing { polygon } => {
                write!(f, "rings of polygon {} cross", polygon)
            }
        }
    }
}

/// Validate a geometry, returning the first problem found
pub fn validate(geometry: &Geometry) -> Result<(), ValidityProblem> {
    if geometry.is_empty() {
        return Err(ValidityProblem::Empty);
    }
    for (pi, polygon) in geometry.polygons().iter().enumerate() {
        validate_polygon(pi, polygon)?;
    }
    Ok(())
}

impl Geometry {
    /// True when [`validate`] finds no problem
    pub fn is_valid(&self) -> bool {
        validate(self).is_ok()
    }
}

fn validate_polygon(pi: usize, polygon: &Polygon) -> Result<(), ValidityProblem> {
    for (ri, ring) in polygon.rings().enumerate() {
        if ring.len() < 4 {
            return Err(ValidityProblem::TooFewPoints { polygon: pi, ring: ri });
        }
        if ring.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ValidityProblem::NonFinite { polygon: pi, ring: ri });
        }
        if ring.first() != ring.last() {
            return Err(ValidityProblem::Unclosed { polygon: pi, ring: ri });
        }
        if ring_self_intersects(ring) {
            return Err(ValidityProblem::SelfIntersection { polygon: pi, ring: ri });
        }
    }

    let rings: Vec<_> = polygon.rings().collect();
    for i in 0..rings.len() {
        for j in (i + 1)..rings.len() {
            if rings_cross(rings[i], rings[j]) {
                return Err(ValidityProblem::RingCrossing { polygon: pi });
            }
        }
    }
    Ok(())
}

/// Non-adjacent segments of a closed ring must not touch
fn ring_self_intersects(ring: &[Point2<f64>]) -> bool {
    let n = ring.len() - 1; // segment count, ring is closed
    for i in 0..n {
        let (a1, a2) = (ring[i], ring[i + 1]);
        if a1 == a2 {
            continue;
        }
        for j in (i + 1)..n {
            // neighbours share an endpoint by construction
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (b1, b2) = (ring[j], ring[j + 1]);
            if segments_touch(&a1, &a2, &b1, &b2) {
                return true;
            }
        }
    }
    false
}

/// Proper crossing between segments of two rings (touching at a vertex is allowed)
fn rings_cross(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            if segments_cross(&sa[0], &sa[1], &sb[0], &sb[1]) {
                return true;
            }
        }
    }
    false
}

fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn sign(v: f64) -> i8 {
    if v > EPSILON_2D {
        1
    } else if v < -EPSILON_2D {
        -1
    } else {
        0
    }
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Segments share at least one point
fn segments_touch(a1: &Point2<f64>, a2: &Point2<f64>, b1: &Point2<f64>, b2: &Point2<f64>) -> bool {
    let d1 = sign(orient(b1, b2, a1));
    let d2 = sign(orient(b1, b2, a2));
    let d3 = sign(orient(a1, a2, b1));
    let d4 = sign(orient(a1, a2, b2));

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && on_segment(b1, b2, a1))
        || (d2 == 0 && on_segment(b1, b2, a2))
        || (d3 == 0 && on_segment(a1, a2, b1))
        || (d4 == 0 && on_segment(a1, a2, b2))
}

/// Segments cross at a single interior point
fn segments_cross(a1: &Point2<f64>, a2: &Point2<f64>, b1: &Point2<f64>, b2: &Point2<f64>) -> bool {
    let d1 = sign(orient(b1, b2, a1));
    let d2 = sign(orient(b1, b2, a2));
    let d3 = sign(orient(a1, a2, b1));
    let d4 = sign(orient(a1, a2, b2));
    d1 * d2 < 0 && d3 * d4 < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn square() -> Vec<Point2<f64>> {
        ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)])
    }

    #[test]
    fn test_square_is_valid() {
        assert!(Geometry::Polygon(Polygon::new(square())).is_valid());
    }

    #[test]
    fn test_bow_tie_is_invalid() {
        let bow_tie = ring(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)]);
        assert_eq!(
            validate(&Geometry::Polygon(Polygon::new(bow_tie))),
            Err(ValidityProblem::SelfIntersection { polygon: 0, ring: 0 })
        );
    }

    #[test]
    fn test_unclosed_ring_is_invalid() {
        let open = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        assert_eq!(
            validate(&Geometry::Polygon(Polygon::new(open))),
            Err(ValidityProblem::Unclosed { polygon: 0, ring: 0 })
        );
    }

    #[test]
    fn test_empty_and_short_rings() {
        assert_eq!(
            validate(&Geometry::MultiPolygon(Vec::new())),
            Err(ValidityProblem::Empty)
        );
        let short = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(
            validate(&Geometry::Polygon(Polygon::new(short))),
            Err(ValidityProblem::TooFewPoints { polygon: 0, ring: 0 })
        );
    }

    #[test]
    fn test_non_finite_coordinates() {
        let bad = ring(&[(0.0, 0.0), (f64::NAN, 0.0), (4.0, 4.0), (0.0, 0.0)]);
        assert!(matches!(
            validate(&Geometry::Polygon(Polygon::new(bad))),
            Err(ValidityProblem::NonFinite { .. })
        ));
    }

    #[test]
    fn test_hole_crossing_shell() {
        let hole = ring(&[(3.0, 1.0), (6.0, 1.0), (6.0, 2.0), (3.0, 2.0), (3.0, 1.0)]);
        let poly = Polygon::with_interiors(square(), vec![hole]);
        assert_eq!(
            validate(&Geometry::Polygon(poly)),
            Err(ValidityProblem::RingCrossing { polygon: 0 })
        );

        let inner = ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)]);
        assert!(Geometry::Polygon(Polygon::with_interiors(square(), vec![inner])).is_valid());
    }
}
