// SPDX-License-Identifier: MPL-2.0
//! Flattening the session into a single raster and exporting it as JPEG.
//!
//! Composition order is fixed: working raster, then stickers, then texts
//! (each in z-order), then the watermark.

use super::worker::CancelFlag;
use crate::application::port::{AssetStore, SavedAsset};
use crate::config::{Config, DEFAULT_EXPORT_PREFIX, DEFAULT_JPEG_QUALITY, EXPORT_TIMESTAMP_FORMAT};
use crate::error::Result;
use crate::media::{encode_jpeg, RasterImage};
use crate::overlay::{OverlayLayer, StickerCatalog, Watermark};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tiny_skia::Transform;

/// Export knobs taken from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub jpeg_quality: u8,
    pub file_prefix: String,
    pub watermark: Option<Watermark>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            file_prefix: DEFAULT_EXPORT_PREFIX.to_owned(),
            watermark: Some(Watermark::default()),
        }
    }
}

impl ExportSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality(),
            file_prefix: config
                .export
                .file_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_EXPORT_PREFIX.to_owned()),
            watermark: Watermark::from_config(&config.watermark),
        }
    }
}

/// `<prefix>yyyyMMdd_HHmmss.jpg`
#[must_use]
pub fn export_file_name(prefix: &str, at: &DateTime<Local>) -> String {
    format!("{prefix}{}.jpg", at.format(EXPORT_TIMESTAMP_FORMAT))
}

/// Layers in the order they are composited: stickers first, then texts.
#[must_use]
pub fn composition_order(layers: &[OverlayLayer]) -> Vec<&OverlayLayer> {
    layers
        .iter()
        .filter(|layer| layer.is_sticker())
        .chain(layers.iter().filter(|layer| layer.is_text()))
        .collect()
}

/// Everything needed to flatten and export, detached from the session.
#[derive(Debug, Clone)]
pub struct ExportJob {
    working: RasterImage,
    layers: Vec<OverlayLayer>,
    view_to_raster: Transform,
    stickers: Arc<StickerCatalog>,
    settings: ExportSettings,
    file_name: String,
}

impl ExportJob {
    pub(crate) fn new(
        working: RasterImage,
        layers: Vec<OverlayLayer>,
        view_to_raster: Transform,
        stickers: Arc<StickerCatalog>,
        settings: ExportSettings,
    ) -> Self {
        let file_name = export_file_name(&settings.file_prefix, &Local::now());
        Self {
            working,
            layers,
            view_to_raster,
            stickers,
            settings,
            file_name,
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Composites layers and watermark onto a copy of the working raster.
    /// The result always has the working raster's dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Cancelled`] if `cancel` fires between
    /// stages, or [`crate::error::Error::Render`] if a layer fails to draw.
    pub fn flatten(&self, cancel: &CancelFlag) -> Result<RasterImage> {
        cancel.check()?;
        let mut canvas = self.working.to_pixmap()?;

        let mut drawn = 0usize;
        for layer in composition_order(&self.layers) {
            cancel.check()?;
            if layer.render(&mut canvas, self.view_to_raster, &self.stickers)? {
                drawn += 1;
            }
        }

        if let Some(watermark) = &self.settings.watermark {
            cancel.check()?;
            watermark.stamp(&mut canvas)?;
        }
        log::debug!(
            "flattened {}x{} with {drawn}/{} layers",
            canvas.width(),
            canvas.height(),
            self.layers.len()
        );
        Ok(RasterImage::from_pixmap(&canvas))
    }

    /// Flattens and encodes as JPEG.
    ///
    /// # Errors
    ///
    /// See [`flatten`](Self::flatten); encoding failures are
    /// [`crate::error::Error::Resource`].
    pub fn encode(&self, cancel: &CancelFlag) -> Result<Vec<u8>> {
        let flattened = self.flatten(cancel)?;
        cancel.check()?;
        encode_jpeg(&flattened, self.settings.jpeg_quality)
    }

    /// Flattens, encodes and hands the file to `store`.
    ///
    /// Cancellation is honored up to the moment the store is called; the
    /// store itself writes atomically.
    ///
    /// # Errors
    ///
    /// See [`encode`](Self::encode) and [`AssetStore::store`].
    pub fn run(self, store: &dyn AssetStore, cancel: &CancelFlag) -> Result<SavedAsset> {
        let bytes = self.encode(cancel)?;
        cancel.check()?;
        let saved = store.store(&bytes, &self.file_name)?;
        log::debug!("exported {} ({} bytes) to {}", self.file_name, bytes.len(), saved.location);
        Ok(saved)
    }
}
