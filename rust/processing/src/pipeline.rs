// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The forest parcel pipeline
//!
//! load → normalize → region filter → interactive map → choropleth.
//! Each step takes the previous table by value; the first error ends the
//! run.

use crate::error::Result;
use forestmap_core::{filter_region, load, normalize, ColumnSet, RegionFilter, Table};
use forestmap_geometry::Crs;
use forestmap_imagery::{compose_map, CompositeRequest, ImageryService};
use forestmap_render::{render_choropleth, ChoroplethStyle, Surface};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Rows shown when logging a table head
const HEAD_ROWS: usize = 5;

/// Inputs, outputs and parameters of one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory searched for the parcel `.geojson`
    pub input_dir: PathBuf,
    /// Interactive map output
    pub map_path: PathBuf,
    pub target_crs: Crs,
    pub columns: ColumnSet,
    pub region: RegionFilter,
    /// Composite parameters; the region is filled in from the parcels
    pub composite: CompositeRequest,
    pub style: ChoroplethStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("downloads"),
            map_path: PathBuf::from("downloads/polygon_map.html"),
            target_crs: Crs::Jgd2011,
            columns: ColumnSet::default(),
            region: RegionFilter::default(),
            composite: CompositeRequest::default(),
            style: ChoroplethStyle::default(),
        }
    }
}

/// Step timings in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub load_time_ms: u64,
    pub normalize_time_ms: u64,
    pub filter_time_ms: u64,
    pub map_time_ms: u64,
    pub render_time_ms: u64,
    pub total_time_ms: u64,
}

/// What a run read and wrote
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub source: PathBuf,
    pub loaded_rows: usize,
    /// Columns after normalization, geometry included
    pub columns: Vec<String>,
    pub region: RegionFilter,
    pub region_rows: usize,
    pub map_path: PathBuf,
    pub plotted: usize,
    pub stats: PipelineStats,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Run every step once
pub fn run(
    config: &PipelineConfig,
    imagery: &dyn ImageryService,
    surface: &mut dyn Surface,
) -> Result<PipelineReport> {
    let total_start = Instant::now();
    let mut stats = PipelineStats::default();

    let start = Instant::now();
    let (source, table) = load(&config.input_dir, config.target_crs)?;
    stats.load_time_ms = elapsed_ms(start);
    let loaded_rows = table.len();
    tracing::info!(
        path = %source.display(),
        rows = loaded_rows,
        columns = table.columns().len(),
        crs = %table.crs(),
        "Loaded parcels"
    );

    let start = Instant::now();
    let table = normalize(table, &config.columns)?;
    stats.normalize_time_ms = elapsed_ms(start);
    log_summary(&table)?;

    let start = Instant::now();
    let table = filter_region(table, &config.columns, &config.region)?;
    stats.filter_time_ms = elapsed_ms(start);
    tracing::info!(
        planning_area = %config.region.planning_area,
        municipality = %config.region.municipality,
        rows = table.len(),
        "Filtered region"
    );

    let start = Instant::now();
    let map_path = compose_map(&table, imagery, &config.composite, &config.map_path)?;
    stats.map_time_ms = elapsed_ms(start);

    let columns = table.columns().to_vec();
    let region_rows = table.len();

    let start = Instant::now();
    let figure = render_choropleth(table, &config.columns.density, &config.style)?;
    surface.present(&figure)?;
    stats.render_time_ms = elapsed_ms(start);

    stats.total_time_ms = elapsed_ms(total_start);
    tracing::info!(
        plotted = figure.drawn,
        total_ms = stats.total_time_ms,
        "Pipeline complete"
    );

    Ok(PipelineReport {
        source,
        loaded_rows,
        columns,
        region: config.region.clone(),
        region_rows,
        map_path,
        plotted: figure.drawn,
        stats,
    })
}

/// Shape, head and distinct values per column
fn log_summary(table: &Table) -> Result<()> {
    let (rows, cols) = table.shape();
    tracing::info!(rows, cols, "Normalized table");

    let head = table.head(HEAD_ROWS);
    for (i, row) in head.rows().iter().enumerate() {
        let cells: Vec<String> = head
            .columns()
            .iter()
            .zip(row)
            .filter(|(name, _)| Some(name.as_str()) != head.geometry_column())
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        tracing::debug!(row = i, "{}", cells.join(", "));
    }

    for name in table.columns() {
        if Some(name.as_str()) == table.geometry_column() {
            continue;
        }
        let unique = table.unique_values(name)?;
        tracing::debug!(column = %name, distinct = unique.len(), "Column values");
        tracing::trace!(column = %name, values = ?unique, "Distinct values");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_crs, Crs::Jgd2011);
        assert_eq!(config.columns.density, "材積/ha");
        assert_eq!(config.region, RegionFilter::new("安芸", "北川村"));
        assert_eq!(config.map_path, PathBuf::from("downloads/polygon_map.html"));
    }
}
