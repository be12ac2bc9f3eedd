// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display surfaces for rendered figures

use crate::choropleth::Choropleth;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Something a figure can be shown on
pub trait Surface {
    fn present(&mut self, figure: &Choropleth) -> Result<()>;
}

/// Writes each figure to a PNG file, creating the parent directory
#[derive(Debug, Clone)]
pub struct PngSurface {
    path: PathBuf,
}

impl PngSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Surface for PngSurface {
    fn present(&mut self, figure: &Choropleth) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        figure.image.save(&self.path)?;
        tracing::info!(path = %self.path.display(), title = %figure.title, "Saved figure");
        Ok(())
    }
}

/// Keeps the last presented figure in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    pub last: Option<Choropleth>,
    pub presented: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for MemorySurface {
    fn present(&mut self, figure: &Choropleth) -> Result<()> {
        self.last = Some(figure.clone());
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choropleth::{render_choropleth, ChoroplethStyle};
    use forestmap_core::Table;
    use forestmap_geometry::Crs;

    fn blank() -> Choropleth {
        let table = Table::new(vec!["v".into(), "geometry".into()], Some(1), Crs::Jgd2011).unwrap();
        let style = ChoroplethStyle {
            width: 40,
            height: 30,
            ..ChoroplethStyle::default()
        };
        render_choropleth(table, "v", &style).unwrap()
    }

    #[test]
    fn test_png_surface_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plot.png");
        let mut surface = PngSurface::new(&path);
        surface.present(&blank()).unwrap();

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (40, 30));
    }

    #[test]
    fn test_memory_surface_keeps_last() {
        let mut surface = MemorySurface::new();
        surface.present(&blank()).unwrap();
        surface.present(&blank()).unwrap();
        assert_eq!(surface.presented, 2);
        assert_eq!(surface.last.unwrap().drawn, 0);
    }
}
