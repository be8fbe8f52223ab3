// SPDX-License-Identifier: MPL-2.0
//! `photo_edit` is the editing core of a mobile photo editor.
//!
//! It owns one raster edit session at a time: crop, rotate, flip, color
//! adjustments and filters with bounded undo/redo, text and sticker overlays
//! positioned in view space, and flattening into a watermarked JPEG.
//! Platform concerns (gallery, camera, storage, permissions) sit behind the
//! traits in [`application::port`].
//!
//! ```ignore
//! use photo_edit::config;
//! use photo_edit::editor::EditSession;
//! use photo_edit::infrastructure::FileAssetStore;
//! use photo_edit::media::FilterKind;
//!
//! let (config, _warning) = config::load();
//! let mut session = EditSession::open("IMG_0001.jpg", &config)?;
//! session.apply_filter(FilterKind::Sepia)?;
//! session.add_sticker_by_name("heart")?;
//! let saved = session.export(&FileAssetStore::from_config(&config))?;
//! ```

#![doc(html_root_url = "https://docs.rs/photo_edit/0.3.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod media;
pub mod notifications;
pub mod overlay;
pub mod paths;
