// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static choropleth of one numeric column
//!
//! Rows without a valid geometry or a finite value are dropped first, the
//! remaining values are normalized between their observed min and max and
//! every parcel is filled with its colour from the ramp. A vertical colour
//! bar at the right edge serves as the legend, with tick values and the
//! legend label beside it. Title and axis labels sit in the margins.

use crate::colormap::{Colormap, Normalize};
use crate::error::Result;
use crate::raster::{fill_polygon, plot_aspect, stroke_polygon, Frame, Viewport};
use crate::text::{format_coordinate, format_tick, Align, Typeface};
use forestmap_core::Table;
use forestmap_geometry::Bounds;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use nalgebra::Point2;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([64, 64, 64, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

const MARGIN_TOP: u32 = 60;
const MARGIN_BOTTOM: u32 = 60;
const MARGIN_LEFT: u32 = 70;
const LEGEND_GAP: u32 = 30;
const LEGEND_WIDTH: u32 = 30;
const TICK_LENGTH: u32 = 6;
const TICK_LABEL_WIDTH: u32 = 70;
const LEGEND_LABEL_WIDTH: u32 = 40;
const TICK_COUNT: usize = 5;

const TITLE_SIZE: f32 = 24.0;
const LABEL_SIZE: f32 = 18.0;
const TICK_SIZE: f32 = 13.0;

/// Figure settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_label: String,
    pub colormap: Colormap,
    /// Outline colour factor applied to the fill, 1.0 keeps the fill colour
    pub outline_shade: f64,
}

impl Default for ChoroplethStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            title: "GeoJSON Data Visualization".to_string(),
            x_label: "Longitude".to_string(),
            y_label: "Latitude".to_string(),
            legend_label: "Timber Volumes /ha".to_string(),
            colormap: Colormap::greens(),
            outline_shade: 0.6,
        }
    }
}

/// Colour bar description
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub label: String,
    pub norm: Normalize,
    /// Tick values from `vmin` to `vmax`
    pub ticks: Vec<f64>,
}

/// A rendered figure
#[derive(Debug, Clone, PartialEq)]
pub struct Choropleth {
    pub image: RgbaImage,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend: Option<Legend>,
    /// Parcels drawn
    pub drawn: usize,
    /// Map bounds in table coordinates, `None` for an empty figure
    pub bounds: Option<Bounds>,
}

/// Keep rows with a valid geometry and a finite value in `column`
pub fn drop_unplottable(table: Table, column: &str) -> Result<Table> {
    let value_idx = table.column_index(column)?;
    let geometry_idx = match table.geometry_column() {
        Some(name) => Some(table.column_index(name)?),
        None => None,
    };
    Ok(table.retain(|row| {
        let geometry_ok = geometry_idx
            .and_then(|i| row[i].as_geometry())
            .map(|g| g.is_valid())
            .unwrap_or(false);
        let value_ok = row[value_idx].as_f64().map(f64::is_finite).unwrap_or(false);
        geometry_ok && value_ok
    }))
}

/// Render `column` of `table` as a choropleth
pub fn render_choropleth(table: Table, column: &str, style: &ChoroplethStyle) -> Result<Choropleth> {
    let before = table.len();
    let table = drop_unplottable(table, column)?;
    if table.len() < before {
        tracing::debug!(
            dropped = before - table.len(),
            kept = table.len(),
            "Dropped unplottable rows"
        );
    }

    let face = Typeface::embedded()?;
    let mut image = RgbaImage::from_pixel(style.width, style.height, BACKGROUND);
    draw_captions(&mut image, &face, style);
    let values: Vec<f64> = table.column(column)?.filter_map(|v| v.as_f64()).collect();

    let norm = match Normalize::from_values(values.iter().copied()) {
        Some(norm) => norm,
        None => {
            tracing::info!(title = %style.title, "No plottable parcels, blank figure");
            return Ok(Choropleth {
                image,
                title: style.title.clone(),
                x_label: style.x_label.clone(),
                y_label: style.y_label.clone(),
                legend: None,
                drawn: 0,
                bounds: None,
            });
        }
    };

    let mut bounds = Bounds::new();
    for row in 0..table.len() {
        if let Some(geometry) = table.geometry(row) {
            bounds = bounds.union(&geometry.bounds());
        }
    }

    let frame = map_frame(style);
    let viewport = Viewport::fit(&bounds, frame, plot_aspect(table.crs(), &bounds));

    let mut drawn = 0;
    for (row, value) in values.iter().enumerate() {
        let Some(geometry) = table.geometry(row) else {
            continue;
        };
        let fill = style.colormap.sample(norm.apply(*value));
        let outline = shade(fill, style.outline_shade);
        for polygon in geometry.polygons() {
            fill_polygon(&mut image, &viewport, polygon, fill);
            stroke_polygon(&mut image, &viewport, polygon, outline);
        }
        drawn += 1;
    }

    draw_axes(&mut image, &face, frame, &viewport, &bounds);
    let legend = draw_legend(&mut image, &face, style, norm);

    tracing::info!(
        title = %style.title,
        x_label = %style.x_label,
        y_label = %style.y_label,
        legend = %style.legend_label,
        drawn,
        vmin = norm.vmin,
        vmax = norm.vmax,
        "Rendered choropleth"
    );

    Ok(Choropleth {
        image,
        title: style.title.clone(),
        x_label: style.x_label.clone(),
        y_label: style.y_label.clone(),
        legend: Some(legend),
        drawn,
        bounds: Some(bounds),
    })
}

/// Plot area left of the legend
fn map_frame(style: &ChoroplethStyle) -> Frame {
    let reserved_x = MARGIN_LEFT + LEGEND_GAP + LEGEND_WIDTH + TICK_LENGTH + TICK_LABEL_WIDTH + LEGEND_LABEL_WIDTH;
    Frame {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        width: style.width.saturating_sub(reserved_x).max(1),
        height: style.height.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM).max(1),
    }
}

/// Title above the map, axis labels below and left of it
fn draw_captions(image: &mut RgbaImage, face: &Typeface, style: &ChoroplethStyle) {
    let frame = map_frame(style);
    let center_x = (frame.x + frame.width / 2) as i32;
    let center_y = (frame.y + frame.height / 2) as i32;

    let title_y = (MARGIN_TOP.saturating_sub(face.line_height(TITLE_SIZE)) / 2) as i32;
    face.draw(image, &style.title, center_x, title_y, TITLE_SIZE, Align::Center, INK);

    let label_y = style.height.saturating_sub(face.line_height(LABEL_SIZE) + 4) as i32;
    face.draw(image, &style.x_label, center_x, label_y, LABEL_SIZE, Align::Center, INK);

    face.draw_vertical(image, &style.y_label, (LABEL_SIZE / 2.0) as i32 + 4, center_y, LABEL_SIZE, INK);
}

fn draw_axes(image: &mut RgbaImage, face: &Typeface, frame: Frame, viewport: &Viewport, bounds: &Bounds) {
    let left = frame.x as f32;
    let bottom = (frame.y + frame.height) as f32;
    let right = (frame.x + frame.width) as f32;
    let top = frame.y as f32;
    draw_line_segment_mut(image, (left, bottom), (right, bottom), AXIS);
    draw_line_segment_mut(image, (left, top), (left, bottom), AXIS);

    if !bounds.is_valid() {
        return;
    }
    let step_x = bounds.width() / (TICK_COUNT - 1) as f64;
    let step_y = bounds.height() / (TICK_COUNT - 1) as f64;
    let tick = TICK_LENGTH as f32;

    for i in 0..TICK_COUNT {
        let lon = bounds.min_x + step_x * i as f64;
        let (px, _) = viewport.to_pixel(&Point2::new(lon, bounds.min_y));
        let px = px as f32;
        draw_line_segment_mut(image, (px, bottom), (px, bottom + tick), AXIS);
        let text = format_coordinate(lon, step_x);
        face.draw(image, &text, px as i32, (bottom + tick) as i32 + 2, TICK_SIZE, Align::Center, INK);

        let lat = bounds.min_y + step_y * i as f64;
        let (_, py) = viewport.to_pixel(&Point2::new(bounds.min_x, lat));
        let py = py as f32;
        draw_line_segment_mut(image, (left - tick, py), (left, py), AXIS);
        let text = format_coordinate(lat, step_y);
        let y = py as i32 - face.line_height(TICK_SIZE) as i32 / 2;
        face.draw(image, &text, (left - tick) as i32 - 3, y, TICK_SIZE, Align::Right, INK);
    }
}

fn draw_legend(image: &mut RgbaImage, face: &Typeface, style: &ChoroplethStyle, norm: Normalize) -> Legend {
    let frame = map_frame(style);
    let x = (frame.x + frame.width + LEGEND_GAP) as i32;
    let top = frame.y as i32;
    let height = frame.height;

    // Darkest at the top
    for dy in 0..height {
        let t = 1.0 - dy as f64 / (height.max(2) - 1) as f64;
        let color = style.colormap.sample(t);
        draw_filled_rect_mut(image, Rect::at(x, top + dy as i32).of_size(LEGEND_WIDTH, 1), color);
    }
    draw_hollow_rect_mut(image, Rect::at(x, top).of_size(LEGEND_WIDTH, height), AXIS);

    let tick_start = x + LEGEND_WIDTH as i32;
    let label_x = tick_start + TICK_LENGTH as i32 + 3;
    let mut ticks = Vec::with_capacity(TICK_COUNT);
    for i in 0..TICK_COUNT {
        let t = i as f64 / (TICK_COUNT - 1) as f64;
        let value = norm.value_at(t);
        ticks.push(value);
        let y = top as f32 + (1.0 - t as f32) * (height.saturating_sub(1)) as f32;
        draw_line_segment_mut(
            image,
            (tick_start as f32, y),
            ((tick_start + TICK_LENGTH as i32) as f32, y),
            AXIS,
        );
        let text = format_tick(value);
        let y = y as i32 - face.line_height(TICK_SIZE) as i32 / 2;
        face.draw(image, &text, label_x, y, TICK_SIZE, Align::Left, INK);
    }

    let label_cx = style.width.saturating_sub(LEGEND_LABEL_WIDTH / 2) as i32;
    face.draw_vertical(image, &style.legend_label, label_cx, top + height as i32 / 2, LABEL_SIZE, INK);

    Legend {
        label: style.legend_label.clone(),
        norm,
        ticks,
    }
}

fn shade(color: Rgba<u8>, factor: f64) -> Rgba<u8> {
    let f = factor.clamp(0.0, 1.0);
    let [r, g, b, a] = color.0;
    let s = |c: u8| (c as f64 * f).round() as u8;
    Rgba([s(r), s(g), s(b), a])
}
