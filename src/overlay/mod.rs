// SPDX-License-Identifier: MPL-2.0
//! Overlay layers drawn above the working raster.
//!
//! A layer is positioned in *view space* (the coordinate system of the
//! on-screen preview). Rendering into the full-resolution raster composes the
//! layer's own transform with the session's view→raster mapping.
//!
//! # Modules
//!
//! - [`text`]: Text layers, styles and SVG-based text rasterization
//! - [`sticker`]: Embedded sticker catalog and sticker layers
//! - [`watermark`]: Export-time watermark stamping

pub mod sticker;
pub mod text;
pub mod watermark;

pub use sticker::{StickerCatalog, StickerId, StickerLayer};
pub use text::{fonts_available, FontFamily, RgbaColor, Shadow, TextLayer, TextStyle};
pub use watermark::{Watermark, WatermarkStyle};

use crate::domain::editing::{LayerScale, Opacity, RotationDegrees};
use crate::domain::geometry::{Point, Rect, Size};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;
use tiny_skia::{BlendMode, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Session-unique layer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Transform
// =============================================================================

/// Placement of a layer in view space.
///
/// `translation` is the top-left corner of the untransformed bounds. Scale and
/// rotation pivot around the center of those bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerTransform {
    pub translation: Point,
    pub scale: LayerScale,
    pub rotation: RotationDegrees,
}

impl LayerTransform {
    #[must_use]
    pub fn at(translation: Point) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            translation: self.translation.offset(dx, dy),
            ..self
        }
    }

    /// Multiplies the scale by `factor`, clamped to the layer scale range.
    #[must_use]
    pub fn scaled_by(self, factor: f32) -> Self {
        Self {
            scale: self.scale.scaled_by(factor),
            ..self
        }
    }

    #[must_use]
    pub fn rotated_by(self, degrees: f32) -> Self {
        Self {
            rotation: self.rotation.rotated_by(degrees),
            ..self
        }
    }

    /// Maps local content coordinates (`0..w`, `0..h`) into view space.
    #[must_use]
    pub fn to_view(&self, local: Size) -> Transform {
        let (half_w, half_h) = (local.width / 2.0, local.height / 2.0);
        let scale = self.scale.value();
        Transform::from_translate(-half_w, -half_h)
            .post_concat(Transform::from_rotate(self.rotation.value()))
            .post_concat(Transform::from_scale(scale, scale))
            .post_concat(Transform::from_translate(
                self.translation.x + half_w,
                self.translation.y + half_h,
            ))
    }
}

/// Applies `transform` to a single point.
#[must_use]
pub fn map_point(transform: &Transform, point: Point) -> Point {
    Point::new(
        transform.sx * point.x + transform.kx * point.y + transform.tx,
        transform.ky * point.x + transform.sy * point.y + transform.ty,
    )
}

/// Axis-aligned bounds of a `local`-sized box after `transform`.
#[must_use]
pub fn transformed_bounds(transform: &Transform, local: Size) -> Rect {
    let corners = Rect::new(0.0, 0.0, local.width, local.height)
        .corners()
        .map(|corner| map_point(transform, corner));
    Rect::bounding(&corners).unwrap_or_default()
}

// =============================================================================
// Layers
// =============================================================================

/// State shared by every layer kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerState {
    pub id: LayerId,
    pub transform: LayerTransform,
    pub alpha: Opacity,
    pub selected: bool,
}

impl LayerState {
    #[must_use]
    pub fn new(id: LayerId, transform: LayerTransform) -> Self {
        Self {
            id,
            transform,
            alpha: Opacity::OPAQUE,
            selected: false,
        }
    }
}

/// An overlay placed above the working raster.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayLayer {
    Text(TextLayer),
    Sticker(StickerLayer),
}

impl OverlayLayer {
    #[must_use]
    pub fn state(&self) -> &LayerState {
        match self {
            OverlayLayer::Text(layer) => &layer.state,
            OverlayLayer::Sticker(layer) => &layer.state,
        }
    }

    pub(crate) fn state_mut(&mut self) -> &mut LayerState {
        match self {
            OverlayLayer::Text(layer) => &mut layer.state,
            OverlayLayer::Sticker(layer) => &mut layer.state,
        }
    }

    #[must_use]
    pub fn id(&self) -> LayerId {
        self.state().id
    }

    #[must_use]
    pub fn transform(&self) -> LayerTransform {
        self.state().transform
    }

    #[must_use]
    pub fn alpha(&self) -> Opacity {
        self.state().alpha
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.state().selected
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, OverlayLayer::Text(_))
    }

    #[must_use]
    pub fn is_sticker(&self) -> bool {
        matches!(self, OverlayLayer::Sticker(_))
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&TextLayer> {
        match self {
            OverlayLayer::Text(layer) => Some(layer),
            OverlayLayer::Sticker(_) => None,
        }
    }

    #[must_use]
    pub fn as_sticker(&self) -> Option<&StickerLayer> {
        match self {
            OverlayLayer::Sticker(layer) => Some(layer),
            OverlayLayer::Text(_) => None,
        }
    }

    pub(crate) fn as_text_mut(&mut self) -> Option<&mut TextLayer> {
        match self {
            OverlayLayer::Text(layer) => Some(layer),
            OverlayLayer::Sticker(_) => None,
        }
    }

    pub fn set_transform(&mut self, transform: LayerTransform) {
        self.state_mut().transform = transform;
    }

    /// Drag delta in view pixels.
    pub fn translate_by(&mut self, dx: f32, dy: f32) {
        let state = self.state_mut();
        state.transform = state.transform.translated(dx, dy);
    }

    /// Pinch delta; the result is clamped to the layer scale range.
    pub fn scale_by(&mut self, factor: f32) {
        let state = self.state_mut();
        state.transform = state.transform.scaled_by(factor);
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        let state = self.state_mut();
        state.transform = state.transform.rotated_by(degrees);
    }

    pub fn set_alpha(&mut self, alpha: Opacity) {
        self.state_mut().alpha = alpha;
    }

    /// Bounds of the content before the layer transform.
    #[must_use]
    pub fn local_size(&self) -> Size {
        match self {
            OverlayLayer::Text(layer) => layer.local_size(),
            OverlayLayer::Sticker(layer) => layer.local_size(),
        }
    }

    /// Local content → view space.
    #[must_use]
    pub fn view_transform(&self) -> Transform {
        self.transform().to_view(self.local_size())
    }

    #[must_use]
    pub fn bounds_in_view(&self) -> Rect {
        transformed_bounds(&self.view_transform(), self.local_size())
    }

    #[must_use]
    pub fn bounds_in_raster(&self, view_to_raster: Transform) -> Rect {
        transformed_bounds(
            &self.view_transform().post_concat(view_to_raster),
            self.local_size(),
        )
    }

    /// Whether a view-space point lands on the (rotated) layer box.
    #[must_use]
    pub fn contains_view_point(&self, point: Point) -> bool {
        let Some(inverse) = self.view_transform().invert() else {
            return false;
        };
        let local = map_point(&inverse, point);
        let size = self.local_size();
        (0.0..=size.width).contains(&local.x) && (0.0..=size.height).contains(&local.y)
    }

    fn rasterize(&self, catalog: &StickerCatalog) -> Result<Arc<Pixmap>> {
        match self {
            OverlayLayer::Text(layer) => layer.rasterize().map(Arc::new),
            OverlayLayer::Sticker(layer) => catalog.rasterize(layer.sticker()),
        }
    }

    /// Draws the layer into `target`, a raster-space pixmap.
    ///
    /// Returns `false` when the layer lies entirely outside the target and
    /// nothing was drawn.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Render`] if the content cannot be
    /// rasterized.
    pub fn render(
        &self,
        target: &mut Pixmap,
        view_to_raster: Transform,
        catalog: &StickerCatalog,
    ) -> Result<bool> {
        let composed = self.view_transform().post_concat(view_to_raster);
        let bounds = transformed_bounds(&composed, self.local_size());
        let canvas = Rect::new(0.0, 0.0, target.width() as f32, target.height() as f32);
        if !bounds.intersects(&canvas) {
            log::debug!("layer {} outside target, skipped", self.id());
            return Ok(false);
        }

        let content = self.rasterize(catalog)?;
        let paint = PixmapPaint {
            opacity: self.alpha().value(),
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };
        target.draw_pixmap(0, 0, (*content).as_ref(), &paint, composed, None);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Size;

    fn sticker_at(x: f32, y: f32) -> OverlayLayer {
        let state = LayerState::new(LayerId::new(7), LayerTransform::at(Point::new(x, y)));
        OverlayLayer::Sticker(StickerLayer::new(
            state,
            StickerId::Heart,
            Size::new(120.0, 120.0),
        ))
    }

    #[test]
    fn identity_transform_places_top_left() {
        let layer = sticker_at(10.0, 20.0);
        assert_eq!(layer.bounds_in_view(), Rect::new(10.0, 20.0, 120.0, 120.0));
    }

    #[test]
    fn scale_pivots_on_center() {
        let mut layer = sticker_at(0.0, 0.0);
        layer.state_mut().transform = layer.transform().scaled_by(2.0);
        let bounds = layer.bounds_in_view();
        assert!((bounds.x + 60.0).abs() < 1e-3);
        assert!((bounds.width - 240.0).abs() < 1e-3);
        assert_eq!(bounds.center(), Point::new(60.0, 60.0));
    }

    #[test]
    fn rotation_grows_bounds() {
        let mut layer = sticker_at(0.0, 0.0);
        layer.state_mut().transform = layer.transform().rotated_by(45.0);
        let bounds = layer.bounds_in_view();
        let diagonal = 120.0 * std::f32::consts::SQRT_2;
        assert!((bounds.width - diagonal).abs() < 0.01);
        assert!((bounds.center().x - 60.0).abs() < 0.01);
    }

    #[test]
    fn raster_bounds_apply_view_mapping() {
        let layer = sticker_at(10.0, 10.0);
        let view_to_raster = Transform::from_scale(2.0, 2.0);
        assert_eq!(
            layer.bounds_in_raster(view_to_raster),
            Rect::new(20.0, 20.0, 240.0, 240.0)
        );
    }

    #[test]
    fn hit_test_respects_rotation() {
        let mut layer = sticker_at(0.0, 0.0);
        assert!(layer.contains_view_point(Point::new(2.0, 2.0)));
        layer.state_mut().transform = layer.transform().rotated_by(45.0);
        assert!(!layer.contains_view_point(Point::new(2.0, 2.0)));
        assert!(layer.contains_view_point(Point::new(60.0, 60.0)));
    }

    #[test]
    fn render_outside_target_draws_nothing() {
        let catalog = StickerCatalog::new();
        let layer = sticker_at(500.0, 500.0);
        let mut target = Pixmap::new(100, 100).unwrap();
        assert!(!layer.render(&mut target, Transform::identity(), &catalog).unwrap());
        assert!(target.pixels().iter().all(|p| p.alpha() == 0));
        assert_eq!(catalog.cached_count(), 0);
    }

    #[test]
    fn render_respects_alpha() {
        let catalog = StickerCatalog::new();
        let mut layer = sticker_at(0.0, 0.0);
        let mut opaque = Pixmap::new(120, 120).unwrap();
        assert!(layer.render(&mut opaque, Transform::identity(), &catalog).unwrap());

        layer.state_mut().alpha = Opacity::HALF;
        let mut half = Pixmap::new(120, 120).unwrap();
        layer.render(&mut half, Transform::identity(), &catalog).unwrap();

        // Heart body, well inside the outline.
        let index = 60 * 120 + 60;
        let full = opaque.pixels()[index].alpha();
        let faded = half.pixels()[index].alpha();
        assert_eq!(full, 255);
        assert!((i32::from(faded) - 128).abs() <= 2);
    }
}
