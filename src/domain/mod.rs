// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core editing rules with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) so that every
//! invariant here can be tested without touching pixels or the filesystem.
//!
//! # Modules
//!
//! - [`editing`]: Editing value objects ([`Brightness`](editing::Brightness),
//!   [`Contrast`](editing::Contrast), [`LayerScale`](editing::LayerScale),
//!   [`Opacity`](editing::Opacity), [`RotationDegrees`](editing::RotationDegrees),
//!   [`TextSize`](editing::TextSize))
//! - [`geometry`]: View/raster space primitives ([`Point`](geometry::Point),
//!   [`Size`](geometry::Size), [`Rect`](geometry::Rect))

pub mod editing;
pub mod geometry;
