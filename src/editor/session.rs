// SPDX-License-Identifier: MPL-2.0
//! The edit session: one source image, its working copy, overlays and history.
//!
//! Every raster edit replaces the current [`EditSnapshot`] and pushes the
//! previous one onto the history. Edits are refused while a crop frame is on
//! screen; a refused edit never changes any state.
//!
//! Each accepted change to the working raster bumps the edit generation.
//! Background filter results carry the generation they started from and are
//! only installed if nothing changed in between.

use super::crop::{CropRatio, EditMode};
use super::flatten::{ExportJob, ExportSettings};
use super::history::{EditSnapshot, HistoryStack};
use super::layer_edit::LayerEdit;
use super::viewport::Viewport;
use super::worker::{CancelFlag, FilterJob, FilteredImage, PendingTask, TaskSlot};
use crate::application::port::{AssetStore, CapturedImage, SavedAsset};
use crate::config::{Config, DEFAULT_CROP_FRAME_FRACTION, FILTER_PREVIEW_SIZE};
use crate::domain::editing::{Brightness, Contrast, RotationDegrees};
use crate::domain::geometry::{Point, Rect, Size};
use crate::error::{Result, ValidationError};
use crate::media::{color, decode_bytes, decode_file, BrightnessMode, DecodeOptions};
use crate::media::{FilterKind, PixelRect, RasterImage};
use crate::overlay::{
    LayerId, LayerState, LayerTransform, OverlayLayer, StickerCatalog, StickerId, StickerLayer,
    TextLayer, TextStyle,
};
use std::mem;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug)]
pub struct EditSession {
    original: RasterImage,
    current: EditSnapshot,
    layers: Vec<OverlayLayer>,
    mode: EditMode,
    viewport: Viewport,
    brightness_mode: BrightnessMode,
    history: HistoryStack,
    generation: u64,
    last_layer_id: u64,
    stickers: Arc<StickerCatalog>,
    export: ExportSettings,
}

impl EditSession {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Starts a session with default settings.
    #[must_use]
    pub fn new(original: RasterImage) -> Self {
        Self::with_config(original, &Config::default())
    }

    #[must_use]
    pub fn with_config(original: RasterImage, config: &Config) -> Self {
        let viewport = Viewport::fit(original.size());
        Self {
            current: EditSnapshot::pristine(original.clone()),
            original,
            layers: Vec::new(),
            mode: EditMode::Viewing,
            viewport,
            brightness_mode: config.brightness_mode(),
            history: HistoryStack::new(config.history_depth()),
            generation: 0,
            last_layer_id: 0,
            stickers: Arc::new(StickerCatalog::new()),
            export: ExportSettings::from_config(config),
        }
    }

    /// Decodes `path` and starts a session on it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Load`] if the image cannot be decoded;
    /// no session is created.
    pub fn open<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self> {
        let image = decode_file(path.as_ref(), &DecodeOptions::from_config(config))?;
        log::debug!(
            "opened {} at {}x{}",
            path.as_ref().display(),
            image.width(),
            image.height()
        );
        Ok(Self::with_config(image, config))
    }

    /// # Errors
    ///
    /// Returns [`crate::error::Error::Load`] for undecodable bytes.
    pub fn from_bytes(bytes: &[u8], config: &Config) -> Result<Self> {
        let image = decode_bytes(bytes, &DecodeOptions::from_config(config))?;
        Ok(Self::with_config(image, config))
    }

    /// # Errors
    ///
    /// Returns [`crate::error::Error::Load`] for an unreadable capture.
    pub fn from_capture(captured: &CapturedImage, config: &Config) -> Result<Self> {
        let image = captured.decode(&DecodeOptions::from_config(config))?;
        Ok(Self::with_config(image, config))
    }

    /// Shares a sticker catalog (and its raster cache) with other sessions.
    #[must_use]
    pub fn with_sticker_catalog(mut self, stickers: Arc<StickerCatalog>) -> Self {
        self.stickers = stickers;
        self
    }

    #[must_use]
    pub fn with_export_settings(mut self, export: ExportSettings) -> Self {
        self.export = export;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn original(&self) -> &RasterImage {
        &self.original
    }

    #[must_use]
    pub fn working(&self) -> &RasterImage {
        &self.current.raster
    }

    #[must_use]
    pub fn layers(&self) -> &[OverlayLayer] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&OverlayLayer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    #[must_use]
    pub fn selected_layer(&self) -> Option<&OverlayLayer> {
        self.layers.iter().find(|layer| layer.is_selected())
    }

    #[must_use]
    pub fn rotation(&self) -> RotationDegrees {
        self.current.rotation
    }

    #[must_use]
    pub fn is_flipped_horizontally(&self) -> bool {
        self.current.flip_horizontal
    }

    #[must_use]
    pub fn is_flipped_vertically(&self) -> bool {
        self.current.flip_vertical
    }

    #[must_use]
    pub fn current_filter(&self) -> FilterKind {
        self.current.filter
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.current.brightness
    }

    #[must_use]
    pub fn contrast(&self) -> Contrast {
        self.current.contrast
    }

    #[must_use]
    pub fn brightness_mode(&self) -> BrightnessMode {
        self.brightness_mode
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Counter bumped by every change to the working raster.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn sticker_catalog(&self) -> &Arc<StickerCatalog> {
        &self.stickers
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn ensure_viewing(&self) -> Result<()> {
        if self.mode.is_viewing() {
            Ok(())
        } else {
            Err(ValidationError::NotInViewingMode.into())
        }
    }

    /// Current display state carried over onto a new raster.
    fn derive(&self, raster: RasterImage) -> EditSnapshot {
        EditSnapshot {
            raster,
            rotation: self.current.rotation,
            flip_horizontal: self.current.flip_horizontal,
            flip_vertical: self.current.flip_vertical,
            filter: self.current.filter,
            brightness: self.current.brightness,
            contrast: self.current.contrast,
        }
    }

    /// Installs `next`, recording the previous state.
    fn commit(&mut self, next: EditSnapshot) {
        let previous = mem::replace(&mut self.current, next);
        self.history.push(previous);
        self.raster_changed();
    }

    fn raster_changed(&mut self) {
        self.generation += 1;
        self.viewport = self.viewport.with_image(self.current.raster.size());
    }

    fn layer_index(&self, id: LayerId) -> Result<usize> {
        self.layers
            .iter()
            .position(|layer| layer.id() == id)
            .ok_or_else(|| ValidationError::UnknownLayer(id.value()).into())
    }

    // =========================================================================
    // Crop
    // =========================================================================

    /// Shows a crop frame covering 80% of the view, centered.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] if already cropping.
    pub fn enter_crop_mode(&mut self) -> Result<()> {
        self.ensure_viewing()?;
        let view = self.viewport.view_size();
        let rect = (!view.is_empty())
            .then(|| Rect::centered_in(view, view.scaled(DEFAULT_CROP_FRAME_FRACTION)));
        self.mode = EditMode::Cropping { rect };
        log::debug!("crop mode entered with {rect:?}");
        Ok(())
    }

    /// Replaces the crop frame (view coordinates) while cropping.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInCropMode`] outside crop mode.
    pub fn set_crop_rect(&mut self, rect: Option<Rect>) -> Result<()> {
        match &mut self.mode {
            EditMode::Cropping { rect: current } => {
                *current = rect;
                Ok(())
            }
            EditMode::Viewing => Err(ValidationError::NotInCropMode.into()),
        }
    }

    #[must_use]
    pub fn crop_rect(&self) -> Option<Rect> {
        self.mode.crop_rect()
    }

    /// Crops the working raster to the frame and returns to viewing.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NotInCropMode`] outside crop mode
    /// - [`ValidationError::NoCropRect`] when no frame is set
    /// - [`ValidationError::EmptyCropRect`] when the frame misses the image
    ///
    /// On error the session stays in crop mode, unchanged.
    pub fn apply_crop(&mut self) -> Result<()> {
        let EditMode::Cropping { rect } = self.mode else {
            return Err(ValidationError::NotInCropMode.into());
        };
        let rect = rect.ok_or(ValidationError::NoCropRect)?;

        let working = self.working();
        let pixels = PixelRect::from_rect(self.viewport.view_rect_to_raster(rect));
        if pixels.clamped(working.width(), working.height()).is_none() {
            return Err(ValidationError::EmptyCropRect.into());
        }

        let cropped = working.crop(pixels);
        log::debug!(
            "crop {:?} -> {}x{}",
            pixels,
            cropped.width(),
            cropped.height()
        );
        let next = self.derive(cropped);
        self.commit(next);
        self.mode = EditMode::Viewing;
        Ok(())
    }

    /// Leaves crop mode without touching the raster.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInCropMode`] outside crop mode.
    pub fn cancel_crop(&mut self) -> Result<()> {
        if !self.mode.is_cropping() {
            return Err(ValidationError::NotInCropMode.into());
        }
        self.mode = EditMode::Viewing;
        Ok(())
    }

    /// Crops to the largest centered rectangle of `ratio` (width / height)
    /// and returns to viewing. Allowed in either mode.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRatio`] for a non-positive ratio.
    pub fn crop_to_ratio(&mut self, ratio: f32) -> Result<()> {
        let cropped = self.working().crop_to_ratio(ratio)?;
        log::debug!("ratio crop {ratio} -> {}x{}", cropped.width(), cropped.height());
        let next = self.derive(cropped);
        self.commit(next);
        self.mode = EditMode::Viewing;
        Ok(())
    }

    /// [`crop_to_ratio`](Self::crop_to_ratio) for one of the tool's presets.
    ///
    /// # Errors
    ///
    /// None in practice; presets are always positive.
    pub fn crop_to_preset(&mut self, preset: CropRatio) -> Result<()> {
        self.crop_to_ratio(preset.ratio())
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Rotates the working raster by `degrees` around its center.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn rotate(&mut self, degrees: f32) -> Result<()> {
        self.ensure_viewing()?;
        let step = RotationDegrees::new(degrees);
        if step.is_zero() {
            return Ok(());
        }
        let mut next = self.derive(self.working().rotate(step)?);
        next.rotation = next.rotation.rotated_by(step.value());
        self.commit(next);
        log::debug!("rotated by {}, total {}", step.value(), self.rotation().value());
        Ok(())
    }

    /// Mirrors along the requested axes and toggles the matching flags.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn flip(&mut self, horizontal: bool, vertical: bool) -> Result<()> {
        self.ensure_viewing()?;
        if !horizontal && !vertical {
            return Ok(());
        }
        let mut next = self.derive(self.working().flip(horizontal, vertical));
        next.flip_horizontal ^= horizontal;
        next.flip_vertical ^= vertical;
        self.commit(next);
        Ok(())
    }

    /// Restores the original raster and clears rotation, flips, filter and
    /// adjustments. The reset itself can be undone.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn reset_transform(&mut self) -> Result<()> {
        self.ensure_viewing()?;
        self.commit(EditSnapshot::pristine(self.original.clone()));
        log::debug!("transform reset");
        Ok(())
    }

    // =========================================================================
    // Color
    // =========================================================================

    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn set_brightness(&mut self, value: i32) -> Result<()> {
        self.ensure_viewing()?;
        self.reapply_adjustments(Brightness::new(value), self.contrast(), self.brightness_mode);
        Ok(())
    }

    /// Contrast always renders through the linear path, whatever the
    /// brightness mode.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn set_contrast(&mut self, value: i32) -> Result<()> {
        self.ensure_viewing()?;
        self.reapply_adjustments(self.brightness(), Contrast::new(value), BrightnessMode::Linear);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn set_brightness_mode(&mut self, mode: BrightnessMode) -> Result<()> {
        self.ensure_viewing()?;
        if mode == self.brightness_mode {
            return Ok(());
        }
        self.brightness_mode = mode;
        self.reapply_adjustments(self.brightness(), self.contrast(), mode);
        Ok(())
    }

    /// Brightness and contrast always start from the original raster, so
    /// earlier geometry and filters are superseded.
    fn reapply_adjustments(
        &mut self,
        brightness: Brightness,
        contrast: Contrast,
        mode: BrightnessMode,
    ) {
        let adjusted = color::adjust(&self.original, brightness, contrast, mode);
        self.commit(EditSnapshot {
            brightness,
            contrast,
            ..EditSnapshot::pristine(adjusted)
        });
        log::debug!(
            "adjusted brightness {} contrast {} ({:?})",
            brightness.value(),
            contrast.value(),
            mode
        );
    }

    /// Applies a named filter on top of the working raster.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn apply_filter(&mut self, kind: FilterKind) -> Result<()> {
        self.ensure_viewing()?;
        let mut next = self.derive(kind.apply(self.working()));
        next.filter = kind;
        self.commit(next);
        log::debug!("filter {kind} applied");
        Ok(())
    }

    /// Small preview of `kind` applied to the working raster.
    #[must_use]
    pub fn filter_preview(&self, kind: FilterKind) -> RasterImage {
        kind.apply(&self.working().thumbnail(FILTER_PREVIEW_SIZE))
    }

    /// Detached filter work for a background slot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn filter_job(&self, kind: FilterKind) -> Result<FilterJob> {
        self.ensure_viewing()?;
        Ok(FilterJob::new(self.working().clone(), kind, self.generation))
    }

    /// Runs `kind` on `slot`; pass the result to [`commit_filter`](Self::commit_filter).
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotInViewingMode`] while cropping, or
    /// [`crate::error::Error::Busy`] if the slot is taken.
    pub fn submit_filter(
        &self,
        slot: &TaskSlot,
        kind: FilterKind,
    ) -> Result<PendingTask<FilteredImage>> {
        let job = self.filter_job(kind)?;
        slot.submit(move |cancel| job.run(cancel))
    }

    /// Installs a background filter result as the new working raster.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::NotInViewingMode`] while cropping
    /// - [`ValidationError::StaleResult`] if the working raster changed after
    ///   the job was created; nothing is installed
    pub fn commit_filter(&mut self, result: FilteredImage) -> Result<()> {
        self.ensure_viewing()?;
        if result.generation != self.generation {
            log::debug!(
                "dropping {} result from generation {}, now {}",
                result.kind,
                result.generation,
                self.generation
            );
            return Err(ValidationError::StaleResult.into());
        }
        let mut next = self.derive(result.image);
        next.filter = result.kind;
        self.commit(next);
        Ok(())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Restores the previous raster and its display state. Returns
    /// `Ok(false)` when there is nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_viewing()?;
        let done = self.history.undo(&mut self.current);
        if done {
            self.raster_changed();
        }
        Ok(done)
    }

    /// Mirror of [`undo`](Self::undo).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotInViewingMode`] while cropping.
    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_viewing()?;
        let done = self.history.redo(&mut self.current);
        if done {
            self.raster_changed();
        }
        Ok(done)
    }

    // =========================================================================
    // Layers
    // =========================================================================

    fn next_layer_id(&self) -> LayerId {
        LayerId::new(self.last_layer_id + 1)
    }

    /// Places content of `local` size at the center of the view.
    fn centered_transform(&self, local: Size) -> LayerTransform {
        let view = self.viewport.view_size();
        LayerTransform::at(Point::new(
            (view.width - local.width) / 2.0,
            (view.height - local.height) / 2.0,
        ))
    }

    fn push_layer(&mut self, mut layer: OverlayLayer) -> LayerId {
        let id = layer.id();
        self.last_layer_id = id.value();
        self.clear_selection();
        layer.state_mut().selected = true;
        self.layers.push(layer);
        id
    }

    /// Adds a text layer at the center of the view and selects it.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotInViewingMode`] while cropping, or
    /// [`ValidationError::EmptyText`] for blank text.
    pub fn add_text_layer(&mut self, text: &str, style: TextStyle) -> Result<LayerId> {
        self.ensure_viewing()?;
        let state = LayerState::new(self.next_layer_id(), LayerTransform::default());
        let mut layer = TextLayer::new(state, text, style)?;
        layer.state.transform = self.centered_transform(layer.local_size());
        let id = self.push_layer(OverlayLayer::Text(layer));
        log::debug!("text layer {id} added");
        Ok(id)
    }

    /// Adds a sticker at the center of the view and selects it.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotInViewingMode`] while cropping, or
    /// [`crate::error::Error::Render`] if the sticker asset is unusable.
    pub fn add_sticker_layer(&mut self, sticker: StickerId) -> Result<LayerId> {
        self.ensure_viewing()?;
        let size = self.stickers.intrinsic_size(sticker)?;
        let state = LayerState::new(self.next_layer_id(), self.centered_transform(size));
        let id = self.push_layer(OverlayLayer::Sticker(StickerLayer::new(state, sticker, size)));
        log::debug!("sticker {sticker} added as layer {id}");
        Ok(id)
    }

    /// Looks the sticker up by catalog name.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownSticker`] for names outside the catalog,
    /// otherwise as [`add_sticker_layer`](Self::add_sticker_layer).
    pub fn add_sticker_by_name(&mut self, name: &str) -> Result<LayerId> {
        self.add_sticker_layer(name.parse()?)
    }

    /// # Errors
    ///
    /// [`ValidationError::NotInViewingMode`] while cropping, or
    /// [`ValidationError::UnknownLayer`].
    pub fn remove_layer(&mut self, id: LayerId) -> Result<OverlayLayer> {
        self.ensure_viewing()?;
        let index = self.layer_index(id)?;
        log::debug!("layer {id} removed");
        Ok(self.layers.remove(index))
    }

    /// Selects `id` and deselects every other layer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownLayer`]; selection is unchanged.
    pub fn select_layer(&mut self, id: LayerId) -> Result<()> {
        let index = self.layer_index(id)?;
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.state_mut().selected = i == index;
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for layer in &mut self.layers {
            layer.state_mut().selected = false;
        }
    }

    /// Topmost layer under a view-space point.
    #[must_use]
    pub fn layer_at(&self, point: Point) -> Option<LayerId> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.contains_view_point(point))
            .map(OverlayLayer::id)
    }

    /// Moves a layer to the top of the z-order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownLayer`].
    pub fn bring_to_front(&mut self, id: LayerId) -> Result<()> {
        let index = self.layer_index(id)?;
        let layer = self.layers.remove(index);
        self.layers.push(layer);
        Ok(())
    }

    /// Direct access for gesture handlers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownLayer`].
    pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut OverlayLayer> {
        let index = self.layer_index(id)?;
        Ok(&mut self.layers[index])
    }

    /// Applies a dialog or gesture delta to one layer, all-or-nothing.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownLayer`], or the edit's own validation errors.
    pub fn edit_layer(&mut self, id: LayerId, edit: &LayerEdit) -> Result<()> {
        edit.apply(self.layer_mut(id)?)
    }

    // =========================================================================
    // View & export
    // =========================================================================

    /// Sets the on-screen view size.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyViewport`] for a zero-area view.
    pub fn set_viewport(&mut self, view: Size) -> Result<()> {
        if view.is_empty() {
            return Err(ValidationError::EmptyViewport.into());
        }
        self.viewport = Viewport::new(view, self.working().size());
        Ok(())
    }

    /// Snapshot of everything an export needs.
    #[must_use]
    pub fn export_job(&self) -> ExportJob {
        ExportJob::new(
            self.working().clone(),
            self.layers.clone(),
            self.viewport.view_to_raster(),
            Arc::clone(&self.stickers),
            self.export.clone(),
        )
    }

    /// Working raster with stickers, texts and watermark composited on top.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Render`] if a layer cannot be drawn.
    pub fn flatten(&self) -> Result<RasterImage> {
        self.export_job().flatten(&CancelFlag::default())
    }

    /// Flattens, encodes and stores on the calling thread.
    ///
    /// # Errors
    ///
    /// See [`ExportJob::run`].
    pub fn export(&self, store: &dyn AssetStore) -> Result<SavedAsset> {
        self.export_job().run(store, &CancelFlag::default())
    }

    /// Exports on `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Busy`] if the slot is taken.
    pub fn submit_export(
        &self,
        slot: &TaskSlot,
        store: Arc<dyn AssetStore>,
    ) -> Result<PendingTask<SavedAsset>> {
        let job = self.export_job();
        slot.submit(move |cancel| job.run(store.as_ref(), cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn session(width: u32, height: u32) -> EditSession {
        let config = Config::default();
        let mut image = RasterImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                image.put_pixel(x, y, [(x % 256) as u8, (y % 256) as u8, 90, 255]);
            }
        }
        EditSession::with_config(image, &config)
    }

    fn validation(result: Result<impl std::fmt::Debug>) -> ValidationError {
        match result {
            Err(Error::Validation(err)) => err,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn crop_frame_covers_80_percent_of_view() {
        let mut s = session(100, 50);
        s.set_viewport(Size::new(200.0, 100.0)).unwrap();
        s.enter_crop_mode().unwrap();
        assert_eq!(s.crop_rect(), Some(Rect::new(20.0, 10.0, 160.0, 80.0)));
        assert!(s.mode().is_cropping());
    }

    #[test]
    fn apply_crop_maps_view_to_raster() {
        let mut s = session(100, 50);
        s.set_viewport(Size::new(200.0, 100.0)).unwrap();
        s.enter_crop_mode().unwrap();
        s.apply_crop().unwrap();
        assert_eq!(s.working().dimensions(), (80, 40));
        assert_eq!(s.working().pixel(0, 0), s.original().pixel(10, 5));
        assert!(s.mode().is_viewing());
        assert!(s.can_undo());
    }

    #[test]
    fn apply_crop_without_rect_changes_nothing() {
        let mut s = session(20, 20);
        s.enter_crop_mode().unwrap();
        s.set_crop_rect(None).unwrap();
        assert_eq!(validation(s.apply_crop()), ValidationError::NoCropRect);
        assert_eq!(s.working(), s.original());
        assert!(!s.can_undo());
        assert!(s.mode().is_cropping());
    }

    #[test]
    fn edits_are_refused_while_cropping() {
        let mut s = session(20, 20);
        s.enter_crop_mode().unwrap();
        assert_eq!(validation(s.rotate(90.0)), ValidationError::NotInViewingMode);
        assert_eq!(validation(s.flip(true, false)), ValidationError::NotInViewingMode);
        assert_eq!(
            validation(s.apply_filter(FilterKind::Invert)),
            ValidationError::NotInViewingMode
        );
        assert_eq!(validation(s.set_brightness(10)), ValidationError::NotInViewingMode);
        assert_eq!(
            validation(s.add_text_layer("x", TextStyle::default())),
            ValidationError::NotInViewingMode
        );
        assert_eq!(s.working(), s.original());

        s.cancel_crop().unwrap();
        assert_eq!(validation(s.cancel_crop()), ValidationError::NotInCropMode);
        s.rotate(90.0).unwrap();
    }

    #[test]
    fn ratio_crop_returns_to_viewing() {
        let mut s = session(40, 20);
        s.enter_crop_mode().unwrap();
        s.crop_to_ratio(1.0).unwrap();
        assert_eq!(s.working().dimensions(), (20, 20));
        assert!(s.mode().is_viewing());
        assert_eq!(validation(s.crop_to_ratio(0.0)), ValidationError::InvalidRatio);
    }

    #[test]
    fn preset_crop_uses_preset_ratio() {
        let mut s = session(160, 160);
        s.crop_to_preset(CropRatio::SixteenNine).unwrap();
        assert_eq!(s.working().dimensions(), (160, 90));
        s.crop_to_preset(CropRatio::Square).unwrap();
        assert_eq!(s.working().dimensions(), (90, 90));
    }

    #[test]
    fn rotation_accumulates_and_resets() {
        let mut s = session(30, 10);
        s.rotate(90.0).unwrap();
        s.rotate(270.0).unwrap();
        assert!(s.rotation().is_zero());
        assert_eq!(s.working().dimensions(), (30, 10));
        s.rotate(90.0).unwrap();
        s.flip(true, false).unwrap();
        assert!(s.is_flipped_horizontally());

        s.reset_transform().unwrap();
        assert_eq!(s.working(), s.original());
        assert!(s.rotation().is_zero());
        assert!(!s.is_flipped_horizontally());
        assert!(s.undo().unwrap());
        assert_eq!(s.working().dimensions(), (10, 30));
        assert_eq!(s.rotation().value(), 90.0);
        assert!(s.is_flipped_horizontally());
    }

    #[test]
    fn undo_restores_display_state_with_raster() {
        let mut s = session(40, 20);
        s.rotate(90.0).unwrap();
        s.apply_filter(FilterKind::Invert).unwrap();
        assert_eq!(s.current_filter(), FilterKind::Invert);

        assert!(s.undo().unwrap());
        assert_eq!(s.current_filter(), FilterKind::None);
        assert_eq!(s.rotation().value(), 90.0);
        assert!(s.undo().unwrap());
        assert_eq!(s.working().dimensions(), (40, 20));
        assert!(s.rotation().is_zero());

        assert!(s.redo().unwrap());
        assert_eq!(s.working().dimensions(), (20, 40));
        assert_eq!(s.rotation().value(), 90.0);
        assert_eq!(s.current_filter(), FilterKind::None);
    }

    #[test]
    fn contrast_uses_linear_path_in_extreme_mode() {
        let mut s = session(8, 8);
        s.set_brightness_mode(BrightnessMode::Extreme).unwrap();
        s.set_brightness(20).unwrap();
        let extreme = color::adjust(
            s.original(),
            Brightness::new(20),
            Contrast::default(),
            BrightnessMode::Extreme,
        );
        assert_eq!(s.working(), &extreme);

        s.set_contrast(30).unwrap();
        let linear = color::adjust(
            s.original(),
            Brightness::new(20),
            Contrast::new(30),
            BrightnessMode::Linear,
        );
        assert_eq!(s.working(), &linear);
    }

    #[test]
    fn undo_restores_slider_values() {
        let mut s = session(8, 8);
        s.set_brightness(40).unwrap();
        s.set_contrast(-20).unwrap();
        assert!(s.undo().unwrap());
        assert_eq!(s.brightness().value(), 40);
        assert_eq!(s.contrast().value(), 0);
        assert!(s.undo().unwrap());
        assert_eq!(s.brightness().value(), 0);
        assert_eq!(s.working(), s.original());
    }

    #[test]
    fn undo_and_redo_are_refused_while_cropping() {
        let mut s = session(20, 20);
        s.flip(true, false).unwrap();
        s.enter_crop_mode().unwrap();
        let flipped = s.working().clone();

        assert_eq!(validation(s.undo()), ValidationError::NotInViewingMode);
        assert_eq!(validation(s.redo()), ValidationError::NotInViewingMode);
        assert_eq!(s.working(), &flipped);
        assert!(s.can_undo());

        s.cancel_crop().unwrap();
        assert!(s.undo().unwrap());
        assert!(!s.is_flipped_horizontally());
    }

    #[test]
    fn double_flip_restores_working() {
        let mut s = session(7, 5);
        s.flip(true, true).unwrap();
        s.flip(true, true).unwrap();
        assert_eq!(s.working(), s.original());
        assert!(!s.is_flipped_horizontally() && !s.is_flipped_vertically());
    }

    #[test]
    fn brightness_derives_from_original() {
        let mut s = session(8, 8);
        s.apply_filter(FilterKind::Invert).unwrap();
        s.set_brightness(0).unwrap();
        assert_eq!(s.working(), s.original());
        assert_eq!(s.current_filter(), FilterKind::None);

        s.set_brightness(999).unwrap();
        assert_eq!(s.brightness().value(), 150);
    }

    #[test]
    fn invert_twice_then_undo_twice() {
        let mut s = session(6, 4);
        let start = s.working().clone();
        s.apply_filter(FilterKind::Invert).unwrap();
        let inverted = s.working().clone();
        s.apply_filter(FilterKind::Invert).unwrap();
        assert_eq!(s.working(), &start);

        assert!(s.undo().unwrap());
        assert_eq!(s.working(), &inverted);
        assert!(s.undo().unwrap());
        assert_eq!(s.working(), &start);
        assert!(!s.undo().unwrap());
        assert!(s.redo().unwrap());
        assert_eq!(s.working(), &inverted);
    }

    #[test]
    fn committed_filter_is_undoable() {
        let mut s = session(4, 4);
        let job = s.filter_job(FilterKind::Grayscale).unwrap();
        let result = job.run(&CancelFlag::default()).unwrap();
        s.commit_filter(result).unwrap();
        assert_eq!(s.current_filter(), FilterKind::Grayscale);
        assert!(s.undo().unwrap());
        assert_eq!(s.working(), s.original());
    }

    #[test]
    fn filter_result_is_dropped_after_a_later_edit() {
        let mut s = session(40, 20);
        let result = s
            .filter_job(FilterKind::Invert)
            .unwrap()
            .run(&CancelFlag::default())
            .unwrap();
        s.rotate(90.0).unwrap();
        let generation = s.generation();

        assert_eq!(validation(s.commit_filter(result)), ValidationError::StaleResult);
        assert_eq!(s.working().dimensions(), (20, 40));
        assert_eq!(s.rotation().value(), 90.0);
        assert_eq!(s.current_filter(), FilterKind::None);
        assert_eq!(s.generation(), generation);
        assert_eq!(s.history().undo_len(), 1);
    }

    #[test]
    fn filter_result_is_dropped_after_undo() {
        let mut s = session(6, 6);
        s.flip(false, true).unwrap();
        let result = s
            .filter_job(FilterKind::Sepia)
            .unwrap()
            .run(&CancelFlag::default())
            .unwrap();
        assert!(s.undo().unwrap());
        assert_eq!(validation(s.commit_filter(result)), ValidationError::StaleResult);
        assert_eq!(s.working(), s.original());
    }

    #[test]
    fn filter_preview_is_small() {
        let s = session(800, 200);
        let preview = s.filter_preview(FilterKind::Sepia);
        assert_eq!(preview.dimensions(), (400, 100));
    }

    #[test]
    fn single_selection_across_layers() {
        let mut s = session(300, 300);
        let text = s.add_text_layer("hello", TextStyle::default()).unwrap();
        let sticker = s.add_sticker_layer(StickerId::Heart).unwrap();
        assert_ne!(text, sticker);
        assert_eq!(s.selected_layer().map(OverlayLayer::id), Some(sticker));

        s.select_layer(text).unwrap();
        let selected: Vec<_> = s.layers().iter().filter(|l| l.is_selected()).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id(), text);

        s.clear_selection();
        assert!(s.selected_layer().is_none());
    }

    #[test]
    fn new_sticker_is_centered_in_view() {
        let mut s = session(300, 200);
        let id = s.add_sticker_layer(StickerId::Sun).unwrap();
        let bounds = s.layer(id).unwrap().bounds_in_view();
        assert_eq!(bounds, Rect::new(90.0, 40.0, 120.0, 120.0));
        assert_eq!(s.layer_at(Point::new(150.0, 100.0)), Some(id));
        assert_eq!(s.layer_at(Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn removing_unknown_layer_fails() {
        let mut s = session(50, 50);
        let id = s.add_sticker_by_name("star").unwrap();
        let removed = s.remove_layer(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(
            validation(s.remove_layer(id)),
            ValidationError::UnknownLayer(id.value())
        );
        assert_eq!(
            validation(s.add_sticker_by_name("dragon")),
            ValidationError::UnknownSticker("dragon".into())
        );
    }

    #[test]
    fn layer_ids_stay_unique_after_removal() {
        let mut s = session(50, 50);
        let first = s.add_sticker_layer(StickerId::Star).unwrap();
        s.remove_layer(first).unwrap();
        let second = s.add_sticker_layer(StickerId::Star).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn edit_layer_applies_scale_clamp() {
        let mut s = session(100, 100);
        let id = s.add_sticker_layer(StickerId::Crown).unwrap();
        s.edit_layer(id, &LayerEdit::new().scale_by(0.1)).unwrap();
        assert_eq!(s.layer(id).unwrap().transform().scale.value(), 0.5);
    }

    #[test]
    fn bring_to_front_reorders() {
        let mut s = session(100, 100);
        let a = s.add_sticker_layer(StickerId::Star).unwrap();
        let b = s.add_sticker_layer(StickerId::Moon).unwrap();
        s.bring_to_front(a).unwrap();
        let order: Vec<_> = s.layers().iter().map(OverlayLayer::id).collect();
        assert_eq!(order, vec![b, a]);
    }

    #[test]
    fn empty_viewport_is_rejected() {
        let mut s = session(10, 10);
        assert_eq!(
            validation(s.set_viewport(Size::new(0.0, 10.0))),
            ValidationError::EmptyViewport
        );
    }

    #[test]
    fn flatten_keeps_working_size() {
        let mut s = session(64, 48).with_export_settings(ExportSettings {
            watermark: None,
            ..ExportSettings::default()
        });
        s.add_sticker_layer(StickerId::Heart).unwrap();
        let flat = s.flatten().unwrap();
        assert_eq!(flat.dimensions(), (64, 48));
    }

    #[test]
    fn load_failure_creates_no_session() {
        let result = EditSession::from_bytes(b"\x00\x01garbage", &Config::default());
        assert!(matches!(result, Err(Error::Load(_))));
    }
}
