// SPDX-License-Identifier: MPL-2.0
//! Crop mode state and preset aspect ratios.

use crate::domain::geometry::Rect;
use std::fmt;

/// What the session is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    /// A crop frame is on screen. `rect` is in view coordinates.
    Cropping { rect: Option<Rect> },
}

impl EditMode {
    #[must_use]
    pub fn is_viewing(&self) -> bool {
        matches!(self, EditMode::Viewing)
    }

    #[must_use]
    pub fn is_cropping(&self) -> bool {
        matches!(self, EditMode::Cropping { .. })
    }

    #[must_use]
    pub fn crop_rect(&self) -> Option<Rect> {
        match self {
            EditMode::Cropping { rect } => *rect,
            EditMode::Viewing => None,
        }
    }
}

/// Aspect ratio presets offered by the crop tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropRatio {
    Square,
    FourThree,
    SixteenNine,
    ThreeFour,
    NineSixteen,
}

impl CropRatio {
    pub const ALL: [CropRatio; 5] = [
        CropRatio::Square,
        CropRatio::FourThree,
        CropRatio::SixteenNine,
        CropRatio::ThreeFour,
        CropRatio::NineSixteen,
    ];

    /// Width divided by height.
    #[must_use]
    pub fn ratio(self) -> f32 {
        let (w, h) = self.parts();
        f32::from(w) / f32::from(h)
    }

    fn parts(self) -> (u8, u8) {
        match self {
            CropRatio::Square => (1, 1),
            CropRatio::FourThree => (4, 3),
            CropRatio::SixteenNine => (16, 9),
            CropRatio::ThreeFour => (3, 4),
            CropRatio::NineSixteen => (9, 16),
        }
    }

    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            CropRatio::Square => "crop-ratio-square",
            CropRatio::FourThree => "crop-ratio-four-three",
            CropRatio::SixteenNine => "crop-ratio-sixteen-nine",
            CropRatio::ThreeFour => "crop-ratio-three-four",
            CropRatio::NineSixteen => "crop-ratio-nine-sixteen",
        }
    }
}

impl fmt::Display for CropRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.parts();
        write!(f, "{w}:{h}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_match_labels() {
        assert_eq!(CropRatio::Square.ratio(), 1.0);
        assert!((CropRatio::SixteenNine.ratio() - 16.0 / 9.0).abs() < f32::EPSILON);
        assert_eq!(CropRatio::ThreeFour.to_string(), "3:4");
    }

    #[test]
    fn crop_rect_only_exists_while_cropping() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(EditMode::Viewing.crop_rect(), None);
        assert_eq!(EditMode::Cropping { rect: Some(rect) }.crop_rect(), Some(rect));
        assert!(EditMode::Cropping { rect: None }.is_cropping());
    }
}
