// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for image editing operations:
//! - [`Brightness`] / [`Contrast`]: Slider values for color adjustment
//! - [`LayerScale`]: Scale factor of an overlay layer
//! - [`Opacity`]: Global alpha multiplier of an overlay layer
//! - [`RotationDegrees`]: Angle normalized to `[0, 360)`
//! - [`TextSize`]: Point size of a text overlay

pub mod newtypes;

pub use newtypes::{Brightness, Contrast, LayerScale, Opacity, RotationDegrees, TextSize};
