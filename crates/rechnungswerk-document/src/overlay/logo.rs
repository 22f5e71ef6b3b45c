// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logo overlay — an image scaled to a fixed width.

use std::sync::Arc;

use rechnungswerk_core::config::LogoConfig;
use rechnungswerk_core::error::Result;
use rechnungswerk_core::mm_to_pt;
use tracing::debug;

use crate::canvas::{ImageAsset, PageSurface, Rect};

#[derive(Debug, Clone)]
pub struct LogoOverlay {
    image: Arc<ImageAsset>,
    left_mm: f32,
    top_mm: f32,
    width_mm: f32,
}

impl LogoOverlay {
    /// Decode the configured image file.
    pub fn load(config: &LogoConfig) -> Result<Self> {
        let image = ImageAsset::from_path(&config.path).map_err(|err| {
            err.into_generation(format!("could not load logo {}", config.path.display()))
        })?;
        debug!(
            path = %config.path.display(),
            width_px = image.width_px(),
            height_px = image.height_px(),
            "logo loaded"
        );
        Ok(Self::from_image(image, config.left_mm, config.top_mm, config.width_mm))
    }

    pub fn from_bytes(bytes: &[u8], left_mm: f32, top_mm: f32, width_mm: f32) -> Result<Self> {
        let image = ImageAsset::from_bytes(bytes)
            .map_err(|err| err.into_generation("could not load logo"))?;
        Ok(Self::from_image(image, left_mm, top_mm, width_mm))
    }

    fn from_image(image: ImageAsset, left_mm: f32, top_mm: f32, width_mm: f32) -> Self {
        Self {
            image: Arc::new(image),
            left_mm,
            top_mm,
            width_mm,
        }
    }

    /// Placement on a page of the given height; the height follows from the
    /// aspect ratio.
    pub fn rect(&self, page_height: f32) -> Rect {
        let width = mm_to_pt(self.width_mm);
        let height = self.image.scaled_height(width);
        Rect {
            x: mm_to_pt(self.left_mm),
            y: page_height - mm_to_pt(self.top_mm) - height,
            width,
            height,
        }
    }

    pub fn render(&self, page: &mut PageSurface) {
        let rect = self.rect(page.height());
        page.add_image(&self.image, rect);
    }
}
