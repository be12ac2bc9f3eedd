// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Map-to-pixel placement and polygon rasterization

use forestmap_geometry::{Bounds, Crs, Polygon};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use nalgebra::Point2;

/// Smallest data extent used when fitting, avoids division by zero for
/// single-point or degenerate bounds
const MIN_EXTENT: f64 = 1e-9;

/// Pixel rectangle inside an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Placement of map bounds into a frame, y axis pointing up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    origin_x: f64,
    origin_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Viewport {
    /// Fit `bounds` into `frame`, centred, keeping `aspect` as the ratio of
    /// the y scale to the x scale.
    pub fn fit(bounds: &Bounds, frame: Frame, aspect: f64) -> Self {
        let data_w = bounds.width().max(MIN_EXTENT);
        let data_h = bounds.height().max(MIN_EXTENT);
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };

        let scale_x = (frame.width as f64 / data_w).min(frame.height as f64 / (data_h * aspect));
        let scale_y = scale_x * aspect;

        let used_w = data_w * scale_x;
        let used_h = data_h * scale_y;
        let offset_x = frame.x as f64 + (frame.width as f64 - used_w) / 2.0;
        let offset_y = frame.y as f64 + (frame.height as f64 - used_h) / 2.0;

        let (cx, cy) = bounds.center().unwrap_or((0.0, 0.0));
        Self {
            origin_x: offset_x - (cx - data_w / 2.0) * scale_x,
            origin_y: offset_y + (cy + data_h / 2.0) * scale_y,
            scale_x,
            scale_y,
        }
    }

    /// Pixel position of a map coordinate
    #[inline]
    pub fn to_pixel(&self, p: &Point2<f64>) -> (f64, f64) {
        (
            self.origin_x + p.x * self.scale_x,
            self.origin_y - p.y * self.scale_y,
        )
    }
}

/// Plot aspect for a CRS: geographic plots stretch latitude by
/// `1 / cos(mean latitude)` so shapes look right at that latitude.
pub fn plot_aspect(crs: Crs, bounds: &Bounds) -> f64 {
    if !crs.is_geographic() {
        return 1.0;
    }
    match bounds.center() {
        Some((_, lat)) => {
            let cos = lat.to_radians().cos();
            if cos.abs() < 1e-6 {
                1.0
            } else {
                1.0 / cos
            }
        }
        None => 1.0,
    }
}

/// Fill a polygon with even-odd scanlines, holes left untouched
pub fn fill_polygon(image: &mut RgbaImage, viewport: &Viewport, polygon: &Polygon, color: Rgba<u8>) {
    let rings: Vec<Vec<(f64, f64)>> = polygon
        .rings()
        .map(|ring| ring.iter().map(|p| viewport.to_pixel(p)).collect())
        .collect();
    fill_rings(image, &rings, color);
}

/// Outline every ring of a polygon
pub fn stroke_polygon(image: &mut RgbaImage, viewport: &Viewport, polygon: &Polygon, color: Rgba<u8>) {
    for ring in polygon.rings() {
        for pair in ring.windows(2) {
            let (x0, y0) = viewport.to_pixel(&pair[0]);
            let (x1, y1) = viewport.to_pixel(&pair[1]);
            draw_line_segment_mut(image, (x0 as f32, y0 as f32), (x1 as f32, y1 as f32), color);
        }
    }
}

fn fill_rings(image: &mut RgbaImage, rings: &[Vec<(f64, f64)>], color: Rgba<u8>) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let mut min_y = f64::MAX;
    let mut max_y = f64::MIN;
    for &(_, y) in rings.iter().flatten() {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y > max_y {
        return;
    }

    let first_row = (min_y - 0.5).ceil().max(0.0) as u32;
    let last_row = ((max_y - 0.5).floor()).min(height as f64 - 1.0);
    if last_row < 0.0 {
        return;
    }
    let last_row = last_row as u32;

    let mut crossings: Vec<f64> = Vec::new();
    for py in first_row..=last_row {
        let yc = py as f64 + 0.5;
        crossings.clear();
        for ring in rings {
            if ring.len() < 2 {
                continue;
            }
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let (ax, ay) = ring[i];
                let (bx, by) = ring[j];
                if (ay > yc) != (by > yc) {
                    crossings.push(ax + (yc - ay) * (bx - ax) / (by - ay));
                }
                j = i;
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0);
            let end = (span[1] - 0.5).floor().min(width as f64 - 1.0);
            if end < start {
                continue;
            }
            for px in start as u32..=end as u32 {
                image.put_pixel(px, py, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
            Point2::new(x0, y0),
        ]
    }

    #[test]
    fn test_viewport_flips_y_and_centres() {
        let bounds = Bounds::from_corners(0.0, 0.0, 10.0, 10.0);
        let frame = Frame { x: 0, y: 0, width: 100, height: 100 };
        let vp = Viewport::fit(&bounds, frame, 1.0);
        assert_eq!(vp.to_pixel(&Point2::new(0.0, 10.0)), (0.0, 0.0));
        assert_eq!(vp.to_pixel(&Point2::new(10.0, 0.0)), (100.0, 100.0));
    }

    #[test]
    fn test_viewport_aspect_letterboxes() {
        let bounds = Bounds::from_corners(0.0, 0.0, 10.0, 10.0);
        let frame = Frame { x: 0, y: 0, width: 100, height: 100 };
        let vp = Viewport::fit(&bounds, frame, 2.0);
        let (x0, y0) = vp.to_pixel(&Point2::new(0.0, 10.0));
        let (x1, y1) = vp.to_pixel(&Point2::new(10.0, 0.0));
        assert_eq!(y1 - y0, 100.0);
        assert_eq!(x1 - x0, 50.0);
        assert_eq!(x0, 25.0);
    }

    #[test]
    fn test_plot_aspect() {
        let bounds = Bounds::from_corners(134.0, 59.0, 135.0, 61.0);
        assert!((plot_aspect(Crs::Jgd2011, &bounds) - 2.0).abs() < 1e-9);
        assert_eq!(plot_aspect(Crs::WebMercator, &bounds), 1.0);
    }

    #[test]
    fn test_fill_with_hole() {
        let mut image = RgbaImage::new(10, 10);
        let bounds = Bounds::from_corners(0.0, 0.0, 10.0, 10.0);
        let vp = Viewport::fit(&bounds, Frame { x: 0, y: 0, width: 10, height: 10 }, 1.0);
        let polygon = Polygon::with_interiors(square(0.0, 0.0, 10.0), vec![square(4.0, 4.0, 2.0)]);
        let red = Rgba([255, 0, 0, 255]);
        fill_polygon(&mut image, &vp, &polygon, red);

        assert_eq!(*image.get_pixel(0, 0), red);
        assert_eq!(*image.get_pixel(9, 9), red);
        assert_eq!(*image.get_pixel(4, 4), Rgba([0, 0, 0, 0]));
        assert_eq!(*image.get_pixel(5, 5), Rgba([0, 0, 0, 0]));
        assert_eq!(*image.get_pixel(3, 5), red);
    }
}
