// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Decode**: Longest side allowed after downsampling
//! - **History**: Undo/redo depth
//! - **Export**: JPEG quality and file naming
//! - **Watermark**: Stamp text, size, opacity and placement
//! - **Editor**: Crop frame and preview sizes

// ==========================================================================
// Decode Defaults
// ==========================================================================

/// Longest side (in pixels) a decoded image may keep before downsampling.
pub const DEFAULT_MAX_DECODE_DIMENSION: u32 = 2048;

/// Smallest accepted decode limit.
pub const MIN_MAX_DECODE_DIMENSION: u32 = 256;

/// Largest accepted decode limit.
pub const MAX_MAX_DECODE_DIMENSION: u32 = 8192;

// ==========================================================================
// History Defaults
// ==========================================================================

/// Number of snapshots kept on each of the undo and redo stacks.
pub const DEFAULT_HISTORY_DEPTH: usize = 10;

/// Minimum history depth.
pub const MIN_HISTORY_DEPTH: usize = 1;

/// Maximum history depth.
pub const MAX_HISTORY_DEPTH: usize = 50;

// ==========================================================================
// Export Defaults
// ==========================================================================

/// JPEG quality used for exported images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Minimum JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// File name prefix of exported images (`PhotoEdit_yyyyMMdd_HHmmss.jpg`).
pub const DEFAULT_EXPORT_PREFIX: &str = "PhotoEdit_";

/// `chrono` format string for the timestamp part of exported file names.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ==========================================================================
// Watermark Defaults
// ==========================================================================

/// Text stamped onto every export.
pub const DEFAULT_WATERMARK_TEXT: &str = "训练营";

/// Watermark font size in raster pixels.
pub const DEFAULT_WATERMARK_FONT_SIZE: f32 = 40.0;

/// Watermark opacity (128/255).
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.5;

/// Distance between the watermark and the image edges.
pub const DEFAULT_WATERMARK_PADDING: f32 = 20.0;

/// Opacity of each stamp in the tiled style (60/255).
pub const TILED_WATERMARK_OPACITY: f32 = 60.0 / 255.0;

/// Font size of the corner badge style.
pub const BADGE_WATERMARK_FONT_SIZE: f32 = 30.0;

/// Inner padding of the corner badge box.
pub const BADGE_WATERMARK_PADDING: f32 = 10.0;

// ==========================================================================
// Editor Defaults
// ==========================================================================

/// Fraction of the view covered by the initial crop frame.
pub const DEFAULT_CROP_FRAME_FRACTION: f32 = 0.8;

/// Edge length of the square filter preview thumbnail.
pub const FILTER_PREVIEW_SIZE: u32 = 400;

/// Number of rasterized stickers kept in memory.
pub const STICKER_CACHE_CAPACITY: usize = 16;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_MAX_DECODE_DIMENSION > 0);
    assert!(DEFAULT_MAX_DECODE_DIMENSION >= MIN_MAX_DECODE_DIMENSION);
    assert!(DEFAULT_MAX_DECODE_DIMENSION <= MAX_MAX_DECODE_DIMENSION);

    assert!(MIN_HISTORY_DEPTH > 0);
    assert!(DEFAULT_HISTORY_DEPTH >= MIN_HISTORY_DEPTH);
    assert!(DEFAULT_HISTORY_DEPTH <= MAX_HISTORY_DEPTH);

    assert!(MIN_JPEG_QUALITY > 0);
    assert!(DEFAULT_JPEG_QUALITY >= MIN_JPEG_QUALITY);
    assert!(DEFAULT_JPEG_QUALITY <= MAX_JPEG_QUALITY);

    assert!(DEFAULT_WATERMARK_OPACITY > 0.0);
    assert!(DEFAULT_WATERMARK_OPACITY <= 1.0);
    assert!(TILED_WATERMARK_OPACITY < DEFAULT_WATERMARK_OPACITY);

    assert!(DEFAULT_CROP_FRAME_FRACTION > 0.0);
    assert!(DEFAULT_CROP_FRAME_FRACTION <= 1.0);
    assert!(STICKER_CACHE_CAPACITY > 0);
};
