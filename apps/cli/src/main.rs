// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! forestmap - timber volume maps of national forest sub-compartments.
//!
//! Reads the parcel GeoJSON from the input directory, keeps one planning
//! area and municipality, writes an interactive map with a Sentinel-2
//! median composite and saves a timber volume density choropleth.
//!
//! All settings come from `FORESTMAP_*` and `EE_*` environment variables,
//! see [`config::Config`].

mod config;

use anyhow::Context;
use config::{Config, ImageryBackend};
use forestmap_imagery::{EarthEngineClient, ImageryService, SceneStack};
use forestmap_render::PngSurface;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,forestmap=debug".into()))
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        input_dir = %config.input_dir.display(),
        map_path = %config.map_path.display(),
        plot_path = %config.plot_path.display(),
        planning_area = %config.planning_area,
        municipality = %config.municipality,
        imagery = ?config.imagery,
        "Starting forestmap"
    );

    let imagery: Box<dyn ImageryService> = match config.imagery {
        ImageryBackend::EarthEngine => Box::new(
            EarthEngineClient::new(&config.ee_api_url, &config.ee_project_id, config.ee_access_token.clone())
                .context("building Earth Engine client")?,
        ),
        ImageryBackend::Scenes => Box::new(
            SceneStack::from_dir(&config.scene_dir)
                .with_context(|| format!("loading scenes from {}", config.scene_dir.display()))?,
        ),
    };
    let mut surface = PngSurface::new(&config.plot_path);

    let report = forestmap_processing::run(&config.pipeline(), imagery.as_ref(), &mut surface)
        .context("forest parcel pipeline failed")?;

    tracing::debug!(report = %serde_json::to_string(&report)?, "Run report");
    tracing::info!(
        parcels = report.region_rows,
        plotted = report.plotted,
        map = %report.map_path.display(),
        plot = %config.plot_path.display(),
        "Done"
    );
    Ok(())
}
