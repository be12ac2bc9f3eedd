// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colour maps and linear normalization

use image::Rgba;

/// ColorBrewer 9-class sequential "Greens"
const GREENS: [[u8; 3]; 9] = [
    [0xf7, 0xfc, 0xf5],
    [0xe5, 0xf5, 0xe0],
    [0xc7, 0xe9, 0xc0],
    [0xa1, 0xd9, 0x9b],
    [0x74, 0xc4, 0x76],
    [0x41, 0xab, 0x5d],
    [0x23, 0x8b, 0x45],
    [0x00, 0x6d, 0x2c],
    [0x00, 0x44, 0x1b],
];

/// Piecewise-linear colour ramp over evenly spaced stops
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<[u8; 3]>,
}

impl Colormap {
    /// Create a ramp; an empty stop list falls back to [`Colormap::greens`]
    pub fn new(stops: Vec<[u8; 3]>) -> Self {
        if stops.is_empty() {
            return Self::greens();
        }
        Self { stops }
    }

    /// Light-to-dark green ramp
    pub fn greens() -> Self {
        Self::new(GREENS.to_vec())
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped
    pub fn sample(&self, t: f64) -> Rgba<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if self.stops.len() == 1 {
            let [r, g, b] = self.stops[0];
            return Rgba([r, g, b, 255]);
        }
        let pos = t * (self.stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        let frac = pos - i as f64;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        Rgba([lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2]), 255])
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::greens()
    }
}

/// Linear map of `[vmin, vmax]` onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Observed range of the finite values, `None` when there are none
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut range: Option<(f64, f64)> = None;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        range.map(|(lo, hi)| Self::new(lo, hi))
    }

    /// Position of `value` in the range. A zero-width range maps to 0.
    pub fn apply(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span == 0.0 {
            return 0.0;
        }
        (value - self.vmin) / span
    }

    /// Inverse of [`Normalize::apply`]
    pub fn value_at(&self, t: f64) -> f64 {
        self.vmin + t * (self.vmax - self.vmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_greens_endpoints() {
        let cmap = Colormap::greens();
        assert_eq!(cmap.sample(0.0), Rgba([0xf7, 0xfc, 0xf5, 255]));
        assert_eq!(cmap.sample(1.0), Rgba([0x00, 0x44, 0x1b, 255]));
        assert_eq!(cmap.sample(2.0), cmap.sample(1.0));
        assert_eq!(cmap.sample(-1.0), cmap.sample(0.0));
    }

    #[test]
    fn test_sample_interpolates() {
        let cmap = Colormap::new(vec![[0, 0, 0], [200, 100, 50]]);
        assert_eq!(cmap.sample(0.5), Rgba([100, 50, 25, 255]));
    }

    #[test]
    fn test_normalize_range() {
        let norm = Normalize::from_values(vec![5.0, f64::INFINITY, 1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!((norm.vmin, norm.vmax), (1.0, 5.0));
        assert_relative_eq!(norm.apply(3.0), 0.5);
        assert_relative_eq!(norm.value_at(0.25), 2.0);
    }

    #[test]
    fn test_normalize_degenerate() {
        assert!(Normalize::from_values(Vec::<f64>::new()).is_none());
        let flat = Normalize::new(4.0, 4.0);
        assert_eq!(flat.apply(4.0), 0.0);
    }
}
