// SPDX-License-Identifier: MPL-2.0
//! Color adjustment: brightness/contrast and named filters.
//!
//! Every adjustment is an affine transform over RGB expressed as a
//! [`ColorMatrix`]; the extreme brightness mode adds a nonlinear offset on
//! top. All functions take a raster by reference and return a new one.

use crate::domain::editing::{Brightness, Contrast};
use crate::media::RasterImage;
use serde::{Deserialize, Serialize};

// ==========================================================================
// Color Matrix
// ==========================================================================

/// 4×5 color matrix in row-major order.
///
/// Rows produce R, G, B, A; columns weigh R, G, B, A and add a constant in
/// 0–255 units:
///
/// ```text
/// R' = m[0]*R + m[1]*G + m[2]*B + m[3]*A + m[4]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix([f32; 20]);

impl ColorMatrix {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    #[must_use]
    pub const fn from_array(values: [f32; 20]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_array(&self) -> &[f32; 20] {
        &self.0
    }

    /// Scales R, G, B independently and adds per-channel offsets.
    #[must_use]
    pub fn scale_offset(scale: [f32; 3], offset: [f32; 3]) -> Self {
        let mut m = Self::IDENTITY.0;
        for channel in 0..3 {
            m[channel * 5 + channel] = scale[channel];
            m[channel * 5 + 4] = offset[channel];
        }
        Self(m)
    }

    /// Same scale and offset on every color channel.
    #[must_use]
    pub fn uniform(scale: f32, offset: f32) -> Self {
        Self::scale_offset([scale; 3], [offset; 3])
    }

    /// Saturation matrix; 0 is grayscale, 1 is identity.
    #[must_use]
    pub fn saturation(s: f32) -> Self {
        const LUMA: [f32; 3] = [0.213, 0.715, 0.072];
        let mut m = Self::IDENTITY.0;
        for row in 0..3 {
            for col in 0..3 {
                let diagonal = if row == col { s } else { 0.0 };
                m[row * 5 + col] = LUMA[col] * (1.0 - s) + diagonal;
            }
        }
        Self(m)
    }

    /// Contrast pivoting around mid-gray: `scale = (c+50)/50`,
    /// `translate = (1-scale)·127.5`.
    #[must_use]
    pub fn contrast(contrast: Contrast) -> Self {
        let (scale, translate) = contrast_scale_translate(contrast);
        Self::uniform(scale, translate)
    }

    /// Linear brightness: adds `b/50` to every color channel.
    #[must_use]
    pub fn brightness(brightness: Brightness) -> Self {
        Self::uniform(1.0, brightness.value() as f32 / 50.0)
    }

    /// Returns the matrix that applies `self` first and `next` second.
    #[must_use]
    pub fn then(&self, next: &ColorMatrix) -> ColorMatrix {
        let a = &self.0;
        let b = &next.0;
        let mut out = [0.0f32; 20];
        for row in 0..4 {
            for col in 0..5 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += b[row * 5 + k] * a[k * 5 + col];
                }
                if col == 4 {
                    sum += b[row * 5 + 4];
                }
                out[row * 5 + col] = sum;
            }
        }
        ColorMatrix(out)
    }

    /// Maps one RGBA pixel. Results are rounded and clamped to 0–255.
    #[must_use]
    pub fn map_pixel(&self, px: [u8; 4]) -> [u8; 4] {
        let m = &self.0;
        let input = [
            f32::from(px[0]),
            f32::from(px[1]),
            f32::from(px[2]),
            f32::from(px[3]),
        ];
        let mut out = [0u8; 4];
        for (row, value) in out.iter_mut().enumerate() {
            let base = row * 5;
            let v = m[base] * input[0]
                + m[base + 1] * input[1]
                + m[base + 2] * input[2]
                + m[base + 3] * input[3]
                + m[base + 4];
            *value = clamp_channel(v.round());
        }
        out
    }

    /// Applies the matrix to every pixel of `image`.
    #[must_use]
    pub fn apply(&self, image: &RasterImage) -> RasterImage {
        image.map_pixels(|px| self.map_pixel(px))
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Returns `(scale, translate)` for a contrast slider value.
#[must_use]
pub fn contrast_scale_translate(contrast: Contrast) -> (f32, f32) {
    let scale = (contrast.value() as f32 + 50.0) / 50.0;
    let translate = (1.0 - scale) * 127.5;
    (scale, translate)
}

// ==========================================================================
// Brightness / Contrast
// ==========================================================================

/// How the brightness slider maps onto pixel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrightnessMode {
    /// Brightness folded into the contrast matrix as a `b/50` offset.
    #[default]
    Linear,
    /// Offset growing superlinearly with the slider: `f·128·(1+|f|/10)`,
    /// `f = b/25`.
    Extreme,
}

impl BrightnessMode {
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            BrightnessMode::Linear => "brightness-mode-linear",
            BrightnessMode::Extreme => "brightness-mode-extreme",
        }
    }

    /// Returns the other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            BrightnessMode::Linear => BrightnessMode::Extreme,
            BrightnessMode::Extreme => BrightnessMode::Linear,
        }
    }
}

/// Additive channel offset used by [`BrightnessMode::Extreme`].
#[must_use]
pub fn extreme_offset(brightness: Brightness) -> f32 {
    let f = brightness.value() as f32 / 25.0;
    f * 128.0 * (1.0 + f.abs() / 10.0)
}

/// Single affine transform for linear mode: contrast, then brightness.
#[must_use]
pub fn linear_matrix(brightness: Brightness, contrast: Contrast) -> ColorMatrix {
    ColorMatrix::contrast(contrast).then(&ColorMatrix::brightness(brightness))
}

/// Applies brightness and contrast to `source` in the given mode.
///
/// Extreme mode shifts channels by [`extreme_offset`] and ignores
/// `contrast`; contrast only takes effect through the linear path.
/// Callers pass the session's original raster so repeated slider moves
/// never accumulate.
#[must_use]
pub fn adjust(
    source: &RasterImage,
    brightness: Brightness,
    contrast: Contrast,
    mode: BrightnessMode,
) -> RasterImage {
    match mode {
        BrightnessMode::Linear => linear_matrix(brightness, contrast).apply(source),
        BrightnessMode::Extreme => {
            let offset = extreme_offset(brightness);
            source.map_pixels(|[r, g, b, a]| {
                [
                    shift_truncated(r, offset),
                    shift_truncated(g, offset),
                    shift_truncated(b, offset),
                    a,
                ]
            })
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn shift_truncated(channel: u8, offset: f32) -> u8 {
    // Truncation toward zero before clamping, matching integer pixel math.
    let v = (f32::from(channel) + offset) as i32;
    v.clamp(0, 255) as u8
}

// ==========================================================================
// Named Filters
// ==========================================================================

/// Named color filters, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Vintage,
    Fresh,
    Warm,
    Cool,
    Bright,
    Contrast,
    Sepia,
    Invert,
}

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::None,
        FilterKind::Grayscale,
        FilterKind::Vintage,
        FilterKind::Fresh,
        FilterKind::Warm,
        FilterKind::Cool,
        FilterKind::Bright,
        FilterKind::Contrast,
        FilterKind::Sepia,
        FilterKind::Invert,
    ];

    /// Stable identifier, also the suffix of the i18n key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Vintage => "vintage",
            FilterKind::Fresh => "fresh",
            FilterKind::Warm => "warm",
            FilterKind::Cool => "cool",
            FilterKind::Bright => "bright",
            FilterKind::Contrast => "contrast",
            FilterKind::Sepia => "sepia",
            FilterKind::Invert => "invert",
        }
    }

    /// Looks a filter up by its [`key`](Self::key).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// i18n key of the display name (e.g. "filter-sepia").
    #[must_use]
    pub fn i18n_key(self) -> String {
        format!("filter-{}", self.key())
    }

    /// Returns the filter's color transform; `None` for the unfiltered entry.
    #[must_use]
    pub fn matrix(self) -> Option<ColorMatrix> {
        let matrix = match self {
            FilterKind::None => return None,
            FilterKind::Grayscale => ColorMatrix::saturation(0.0),
            FilterKind::Vintage => ColorMatrix::saturation(0.7).then(&ColorMatrix::scale_offset(
                [1.1, 0.9, 0.8],
                [10.0, 0.0, 0.0],
            )),
            FilterKind::Fresh => {
                ColorMatrix::saturation(1.5).then(&ColorMatrix::uniform(1.0, 20.0))
            }
            FilterKind::Warm => ColorMatrix::scale_offset([1.2, 1.1, 0.9], [0.0; 3]),
            FilterKind::Cool => ColorMatrix::scale_offset([0.9, 1.0, 1.2], [0.0; 3]),
            FilterKind::Bright => ColorMatrix::uniform(1.3, 30.0),
            FilterKind::Contrast => ColorMatrix::uniform(1.5, (-0.5 * 1.5 + 0.5) * 255.0),
            FilterKind::Sepia => ColorMatrix::from_array([
                0.393, 0.769, 0.189, 0.0, 0.0, //
                0.349, 0.686, 0.168, 0.0, 0.0, //
                0.272, 0.534, 0.131, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]),
            FilterKind::Invert => ColorMatrix::uniform(-1.0, 255.0),
        };
        Some(matrix)
    }

    /// Applies the filter, returning a new raster.
    #[must_use]
    pub fn apply(self, image: &RasterImage) -> RasterImage {
        match self.matrix() {
            Some(matrix) => matrix.apply(image),
            None => image.clone(),
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
