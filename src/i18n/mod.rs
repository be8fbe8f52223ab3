// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support.
//!
//! This module provides localization using the Fluent system. It resolves
//! notification keys, filter names and crop-ratio labels.
//!
//! # Features
//!
//! - Locale detection from an explicit request, config, or system settings
//! - Embedded `.ftl` translation files (`en-US`, `zh-CN`)
//! - Runtime language switching
//! - Fallback to `en-US` when the preferred locale is unavailable

pub mod fluent;

pub use fluent::I18n;
