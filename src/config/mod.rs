// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language
//! - `[decode]` - Downsampling limit and EXIF orientation
//! - `[history]` - Undo/redo depth
//! - `[adjustment]` - Brightness mode
//! - `[export]` - JPEG quality, file prefix, private-storage fallback
//! - `[watermark]` - Stamp text, style, size and opacity
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `PHOTO_EDIT_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use photo_edit::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.history.depth = Some(20);
//!
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::media::BrightnessMode;
use crate::overlay::WatermarkStyle;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "zh-CN").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Image decoding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecodeConfig {
    /// Longest side kept after power-of-two downsampling.
    #[serde(
        default = "default_max_dimension",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_dimension: Option<u32>,

    /// Rotate/flip decoded pixels according to the EXIF orientation tag.
    #[serde(
        default = "default_apply_exif_orientation",
        skip_serializing_if = "Option::is_none"
    )]
    pub apply_exif_orientation: Option<bool>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            apply_exif_orientation: default_apply_exif_orientation(),
        }
    }
}

/// Undo/redo settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Snapshots kept per stack.
    #[serde(default = "default_history_depth", skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            depth: default_history_depth(),
        }
    }
}

/// Color adjustment settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AdjustmentConfig {
    /// How the brightness slider maps onto pixel values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness_mode: Option<BrightnessMode>,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// JPEG quality (1-100).
    #[serde(default = "default_jpeg_quality", skip_serializing_if = "Option::is_none")]
    pub jpeg_quality: Option<u8>,

    /// File name prefix before the timestamp.
    #[serde(default = "default_file_prefix", skip_serializing_if = "Option::is_none")]
    pub file_prefix: Option<String>,

    /// Retry in private storage when the shared pictures folder is not writable.
    #[serde(
        default = "default_fallback_to_private",
        skip_serializing_if = "Option::is_none"
    )]
    pub fallback_to_private: Option<bool>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            file_prefix: default_file_prefix(),
            fallback_to_private: default_fallback_to_private(),
        }
    }
}

/// Watermark settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatermarkConfig {
    #[serde(default = "default_watermark_enabled", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default = "default_watermark_text", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<WatermarkStyle>,

    /// Font size in raster pixels.
    #[serde(default = "default_watermark_font_size", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Opacity (0.0 to 1.0).
    #[serde(default = "default_watermark_opacity", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: default_watermark_enabled(),
            text: default_watermark_text(),
            style: Some(WatermarkStyle::default()),
            font_size: default_watermark_font_size(),
            opacity: default_watermark_opacity(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Crate configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub decode: DecodeConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub adjustment: AdjustmentConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub watermark: WatermarkConfig,
}

impl Config {
    /// Decode limit, clamped to the supported range.
    #[must_use]
    pub fn max_decode_dimension(&self) -> u32 {
        self.decode
            .max_dimension
            .unwrap_or(DEFAULT_MAX_DECODE_DIMENSION)
            .clamp(MIN_MAX_DECODE_DIMENSION, MAX_MAX_DECODE_DIMENSION)
    }

    /// History depth, clamped to the supported range.
    #[must_use]
    pub fn history_depth(&self) -> usize {
        self.history
            .depth
            .unwrap_or(DEFAULT_HISTORY_DEPTH)
            .clamp(MIN_HISTORY_DEPTH, MAX_HISTORY_DEPTH)
    }

    /// JPEG quality, clamped to 1-100.
    #[must_use]
    pub fn jpeg_quality(&self) -> u8 {
        self.export
            .jpeg_quality
            .unwrap_or(DEFAULT_JPEG_QUALITY)
            .clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
    }

    #[must_use]
    pub fn brightness_mode(&self) -> BrightnessMode {
        self.adjustment.brightness_mode.unwrap_or_default()
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_max_dimension() -> Option<u32> {
    Some(DEFAULT_MAX_DECODE_DIMENSION)
}

fn default_apply_exif_orientation() -> Option<bool> {
    Some(true)
}

fn default_history_depth() -> Option<usize> {
    Some(DEFAULT_HISTORY_DEPTH)
}

fn default_jpeg_quality() -> Option<u8> {
    Some(DEFAULT_JPEG_QUALITY)
}

fn default_file_prefix() -> Option<String> {
    Some(DEFAULT_EXPORT_PREFIX.to_string())
}

fn default_fallback_to_private() -> Option<bool> {
    Some(true)
}

fn default_watermark_enabled() -> Option<bool> {
    Some(true)
}

fn default_watermark_text() -> Option<String> {
    Some(DEFAULT_WATERMARK_TEXT.to_string())
}

fn default_watermark_font_size() -> Option<f32> {
    Some(DEFAULT_WATERMARK_FONT_SIZE)
}

fn default_watermark_opacity() -> Option<f32> {
    Some(DEFAULT_WATERMARK_OPACITY)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with an i18n key describing the problem.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("ignoring unreadable config {}: {}", path.display(), err);
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
