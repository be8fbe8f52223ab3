// SPDX-License-Identifier: MPL-2.0
//! Deltas coming from gestures and style dialogs, applied to one layer.

use crate::domain::editing::{Opacity, TextSize};
use crate::error::{Result, ValidationError};
use crate::overlay::{FontFamily, OverlayLayer, RgbaColor, TextStyle};

/// Changes to a text layer's style. `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextStyleEdit {
    pub font: Option<FontFamily>,
    pub size: Option<TextSize>,
    pub color: Option<RgbaColor>,
    pub shadow: Option<bool>,
}

impl TextStyleEdit {
    pub fn apply_to(&self, style: &mut TextStyle) {
        if let Some(font) = self.font {
            style.font = font;
        }
        if let Some(size) = self.size {
            style.size = size;
        }
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(shadow) = self.shadow {
            style.shadow = shadow;
        }
    }
}

/// A batch of changes to one layer, applied all-or-nothing.
///
/// ```ignore
/// session.edit_layer(id, &LayerEdit::new().translate(12.0, -4.0).scale_by(1.1))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerEdit {
    pub translate: Option<(f32, f32)>,
    pub scale_by: Option<f32>,
    pub rotate_by: Option<f32>,
    pub alpha: Option<Opacity>,
    /// Text layers only.
    pub text: Option<String>,
    /// Text layers only.
    pub style: Option<TextStyleEdit>,
}

impl LayerEdit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn translate(mut self, dx: f32, dy: f32) -> Self {
        self.translate = Some((dx, dy));
        self
    }

    #[must_use]
    pub fn scale_by(mut self, factor: f32) -> Self {
        self.scale_by = Some(factor);
        self
    }

    #[must_use]
    pub fn rotate_by(mut self, degrees: f32) -> Self {
        self.rotate_by = Some(degrees);
        self
    }

    #[must_use]
    pub fn alpha(mut self, alpha: Opacity) -> Self {
        self.alpha = Some(alpha);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn style(mut self, style: TextStyleEdit) -> Self {
        self.style = Some(style);
        self
    }

    fn touches_text(&self) -> bool {
        self.text.is_some() || self.style.is_some()
    }

    fn validate(&self, layer: &OverlayLayer) -> Result<()> {
        if self.touches_text() && !layer.is_text() {
            return Err(ValidationError::LayerKindMismatch.into());
        }
        if self.text.as_deref().is_some_and(|text| text.trim().is_empty()) {
            return Err(ValidationError::EmptyText.into());
        }
        Ok(())
    }

    /// Applies every change, or none if any is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LayerKindMismatch`] for text changes on a
    /// sticker and [`ValidationError::EmptyText`] for blank text.
    pub(crate) fn apply(&self, layer: &mut OverlayLayer) -> Result<()> {
        self.validate(layer)?;

        if let Some((dx, dy)) = self.translate {
            layer.translate_by(dx, dy);
        }
        if let Some(factor) = self.scale_by {
            layer.scale_by(factor);
        }
        if let Some(degrees) = self.rotate_by {
            layer.rotate_by(degrees);
        }
        if let Some(alpha) = self.alpha {
            layer.set_alpha(alpha);
        }
        if let Some(text_layer) = layer.as_text_mut() {
            if let Some(text) = &self.text {
                text_layer.set_text(text)?;
            }
            if let Some(style) = &self.style {
                style.apply_to(&mut text_layer.style);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{Point, Size};
    use crate::error::Error;
    use crate::overlay::{
        LayerId, LayerState, LayerTransform, StickerId, StickerLayer, TextLayer,
    };

    fn text_layer() -> OverlayLayer {
        let state = LayerState::new(LayerId::new(1), LayerTransform::default());
        OverlayLayer::Text(TextLayer::new(state, "hello", TextStyle::default()).unwrap())
    }

    fn sticker_layer() -> OverlayLayer {
        let state = LayerState::new(LayerId::new(2), LayerTransform::default());
        OverlayLayer::Sticker(StickerLayer::new(state, StickerId::Moon, Size::new(120.0, 120.0)))
    }

    #[test]
    fn gesture_deltas_accumulate() {
        let mut layer = sticker_layer();
        let edit = LayerEdit::new().translate(5.0, 6.0).scale_by(10.0).rotate_by(-90.0);
        edit.apply(&mut layer).unwrap();
        edit.apply(&mut layer).unwrap();

        let transform = layer.transform();
        assert_eq!(transform.translation, Point::new(10.0, 12.0));
        assert_eq!(transform.scale.value(), 3.0);
        assert_eq!(transform.rotation.value(), 180.0);
    }

    #[test]
    fn text_edit_on_sticker_is_rejected_atomically() {
        let mut layer = sticker_layer();
        let edit = LayerEdit::new().translate(5.0, 0.0).text("nope");
        let err = edit.apply(&mut layer).unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::LayerKindMismatch));
        assert_eq!(layer.transform().translation, Point::default());
    }

    #[test]
    fn style_edit_changes_only_given_fields() {
        let mut layer = text_layer();
        let edit = LayerEdit::new().text("bye").style(TextStyleEdit {
            font: Some(FontFamily::Serif),
            shadow: Some(false),
            ..TextStyleEdit::default()
        });
        edit.apply(&mut layer).unwrap();

        let text = layer.as_text().unwrap();
        assert_eq!(text.text(), "bye");
        assert_eq!(text.style.font, FontFamily::Serif);
        assert!(!text.style.shadow);
        assert_eq!(text.style.size, TextSize::default());
    }

    #[test]
    fn blank_text_leaves_layer_untouched() {
        let mut layer = text_layer();
        let edit = LayerEdit::new().alpha(Opacity::HALF).text(" ");
        assert!(edit.apply(&mut layer).is_err());
        assert_eq!(layer.alpha(), Opacity::OPAQUE);
        assert_eq!(layer.as_text().unwrap().text(), "hello");
    }
}
