// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for editing values,
//! ensuring they are always within valid ranges.

// =============================================================================
// Brightness Bounds
// =============================================================================

/// Brightness slider bounds (-150 to +150).
pub mod brightness_bounds {
    /// Minimum brightness value.
    pub const MIN: i32 = -150;
    /// Maximum brightness value.
    pub const MAX: i32 = 150;
    /// Default (neutral) brightness value.
    pub const DEFAULT: i32 = 0;
}

// =============================================================================
// Brightness
// =============================================================================

/// Brightness slider value, guaranteed to be within valid range (-150 to +150).
///
/// A value of 0 means no adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Brightness(i32);

impl Brightness {
    /// Creates a new brightness value, clamping to the valid range.
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(value.clamp(brightness_bounds::MIN, brightness_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> i32 {
        self.0
    }

    /// Returns whether this represents no adjustment (value is 0).
    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.0 == brightness_bounds::DEFAULT
    }
}

// =============================================================================
// Contrast Bounds
// =============================================================================

/// Contrast slider bounds (-50 to +150).
///
/// -50 maps to a flat mid-gray (scale 0), +150 to a 4x stretch.
pub mod contrast_bounds {
    /// Minimum contrast value.
    pub const MIN: i32 = -50;
    /// Maximum contrast value.
    pub const MAX: i32 = 150;
    /// Default (neutral) contrast value.
    pub const DEFAULT: i32 = 0;
}

// =============================================================================
// Contrast
// =============================================================================

/// Contrast slider value, guaranteed to be within valid range (-50 to +150).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contrast(i32);

impl Contrast {
    /// Creates a new contrast value, clamping to the valid range.
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(value.clamp(contrast_bounds::MIN, contrast_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> i32 {
        self.0
    }

    /// Returns whether this represents no adjustment (value is 0).
    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.0 == contrast_bounds::DEFAULT
    }
}

// =============================================================================
// Layer Scale Bounds
// =============================================================================

/// Overlay layer scale bounds (0.5x to 3.0x).
pub mod scale_bounds {
    /// Minimum scale factor.
    pub const MIN: f32 = 0.5;
    /// Maximum scale factor.
    pub const MAX: f32 = 3.0;
    /// Default scale factor.
    pub const DEFAULT: f32 = 1.0;
}

// =============================================================================
// LayerScale
// =============================================================================

/// Scale factor of an overlay layer, guaranteed to be within 0.5x–3.0x.
///
/// Pinch gestures multiply the current factor; the result is clamped here so
/// callers never need to remember the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerScale(f32);

impl LayerScale {
    /// Creates a new scale factor, clamping to the valid range.
    ///
    /// Non-finite input falls back to the default factor.
    #[must_use]
    pub fn new(factor: f32) -> Self {
        if !factor.is_finite() {
            return Self::default();
        }
        Self(factor.clamp(scale_bounds::MIN, scale_bounds::MAX))
    }

    /// Returns the raw factor.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Multiplies the current factor by `delta`, clamping the result.
    #[must_use]
    pub fn scaled_by(self, delta: f32) -> Self {
        Self::new(self.0 * delta)
    }

    /// Returns whether the scale is at the minimum value.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= scale_bounds::MIN
    }

    /// Returns whether the scale is at the maximum value.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= scale_bounds::MAX
    }
}

impl Default for LayerScale {
    fn default() -> Self {
        Self(scale_bounds::DEFAULT)
    }
}

// =============================================================================
// Opacity
// =============================================================================

/// Opacity in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f32);

impl Opacity {
    /// Fully opaque.
    pub const OPAQUE: Self = Self(1.0);
    /// Half transparent, used by the export watermark.
    pub const HALF: Self = Self(0.5);

    /// Creates a new opacity, clamping to `[0.0, 1.0]`.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::OPAQUE;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates an opacity from a 0–100 percentage slider.
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        Self::new(f32::from(percent) / 100.0)
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the opacity as an 8-bit alpha value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_alpha_u8(self) -> u8 {
        // Clamped to [0, 1] so the product fits in a u8.
        (self.0 * 255.0).round() as u8
    }

    /// Returns whether nothing would be drawn at this opacity.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.0 <= 0.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}

// =============================================================================
// RotationDegrees
// =============================================================================

/// Rotation angle in degrees, normalized to `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationDegrees(f32);

impl RotationDegrees {
    /// Creates a new angle, normalizing it into `[0, 360)`.
    #[must_use]
    pub fn new(degrees: f32) -> Self {
        if !degrees.is_finite() {
            return Self::default();
        }
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
        if normalized >= 360.0 {
            Self(0.0)
        } else {
            Self(normalized)
        }
    }

    /// Returns the normalized angle.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns this angle rotated by `delta` degrees, normalized.
    #[must_use]
    pub fn rotated_by(self, delta: f32) -> Self {
        Self::new(self.0 + delta)
    }

    /// Returns whether the angle is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

// =============================================================================
// Text Size Bounds
// =============================================================================

/// Text overlay point size bounds (12 to 36).
pub mod text_size_bounds {
    /// Minimum point size.
    pub const MIN: f32 = 12.0;
    /// Maximum point size.
    pub const MAX: f32 = 36.0;
    /// Default point size for newly added text.
    pub const DEFAULT: f32 = 24.0;
}

// =============================================================================
// TextSize
// =============================================================================

/// Point size of a text overlay, guaranteed to be within 12–36.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize(f32);

impl TextSize {
    /// Creates a new text size, clamping to the valid range.
    #[must_use]
    pub fn new(size: f32) -> Self {
        if !size.is_finite() {
            return Self::default();
        }
        Self(size.clamp(text_size_bounds::MIN, text_size_bounds::MAX))
    }

    /// Returns the raw point size.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for TextSize {
    fn default() -> Self {
        Self(text_size_bounds::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_clamps_values() {
        assert_eq!(Brightness::new(400).value(), 150);
        assert_eq!(Brightness::new(-400).value(), -150);
        assert_eq!(Brightness::new(42).value(), 42);
        assert!(Brightness::default().is_neutral());
    }

    #[test]
    fn contrast_range_is_asymmetric() {
        assert_eq!(Contrast::new(-80).value(), -50);
        assert_eq!(Contrast::new(200).value(), 150);
        assert!(Contrast::new(0).is_neutral());
    }

    #[test]
    fn layer_scale_clamps_and_multiplies() {
        assert_eq!(LayerScale::new(0.1).value(), 0.5);
        assert_eq!(LayerScale::new(10.0).value(), 3.0);
        assert!(LayerScale::new(0.1).is_min());
        assert!(LayerScale::new(10.0).is_max());

        let scale = LayerScale::new(2.0).scaled_by(2.0);
        assert_eq!(scale.value(), 3.0);

        assert_eq!(LayerScale::new(f32::NAN), LayerScale::default());
    }

    #[test]
    fn opacity_clamps_and_converts() {
        assert_eq!(Opacity::new(1.5).value(), 1.0);
        assert_eq!(Opacity::new(-0.5).value(), 0.0);
        assert_eq!(Opacity::HALF.as_alpha_u8(), 128);
        assert_eq!(Opacity::from_percent(100), Opacity::OPAQUE);
        assert!(Opacity::new(0.0).is_transparent());
    }

    #[test]
    fn rotation_normalizes_into_range() {
        assert_eq!(RotationDegrees::new(370.0).value(), 10.0);
        assert_eq!(RotationDegrees::new(-90.0).value(), 270.0);
        assert_eq!(RotationDegrees::new(360.0).value(), 0.0);
        assert!(RotationDegrees::new(720.0).is_zero());

        let angle = RotationDegrees::new(270.0).rotated_by(90.0);
        assert!(angle.is_zero());
    }

    #[test]
    fn text_size_clamps() {
        assert_eq!(TextSize::new(4.0).value(), 12.0);
        assert_eq!(TextSize::new(100.0).value(), 36.0);
        assert_eq!(TextSize::default().value(), 24.0);
    }
}
