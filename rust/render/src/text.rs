// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Figure text drawn with the bundled DejaVu Sans face

use crate::error::{Error, Result};
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::imageops::{overlay, rotate270};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Horizontal placement of a label relative to its anchor x
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Label renderer over the embedded font
pub struct Typeface {
    font: FontRef<'static>,
}

impl Typeface {
    pub fn embedded() -> Result<Self> {
        let font = FontRef::try_from_slice(DEJAVU_SANS).map_err(|e| Error::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Width and height of `text` at `size` pixels
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        text_size(PxScale::from(size), &self.font, text)
    }

    /// Ascent to descent at `size` pixels, the vertical room a line needs
    pub fn line_height(&self, size: f32) -> u32 {
        self.font.as_scaled(PxScale::from(size)).height().ceil() as u32
    }

    /// Draw `text` with its top edge at `y`
    pub fn draw(&self, image: &mut RgbaImage, text: &str, x: i32, y: i32, size: f32, align: Align, color: Rgba<u8>) {
        if text.is_empty() {
            return;
        }
        let (w, _) = self.measure(text, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - w as i32 / 2,
            Align::Right => x - w as i32,
        };
        draw_text_mut(image, color, left, y, PxScale::from(size), &self.font, text);
    }

    /// Draw `text` reading bottom to top, centred on (`cx`, `cy`)
    pub fn draw_vertical(&self, image: &mut RgbaImage, text: &str, cx: i32, cy: i32, size: f32, color: Rgba<u8>) {
        if text.is_empty() {
            return;
        }
        let (w, _) = self.measure(text, size);
        let h = self.line_height(size);
        let mut strip = RgbaImage::from_pixel(w.max(1) + 2, h.max(1), Rgba([color[0], color[1], color[2], 0]));
        draw_text_mut(&mut strip, color, 0, 0, PxScale::from(size), &self.font, text);
        let rotated = rotate270(&strip);
        let left = cx as i64 - rotated.width() as i64 / 2;
        let top = cy as i64 - rotated.height() as i64 / 2;
        overlay(image, &rotated, left, top);
    }
}

/// Tick label text, fewer decimals for larger magnitudes
pub fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1000.0 {
        format!("{value:.0}")
    } else if magnitude >= 100.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

/// Axis label for a coordinate, with enough decimals to tell ticks `step`
/// apart
pub fn format_coordinate(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step > 0.0 {
        (-step.log10().floor()).clamp(0.0, 6.0) as usize
    } else {
        0
    };
    format!("{value:.decimals$}")
}
