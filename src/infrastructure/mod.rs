// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`, backed by the local filesystem.
//!
//! # Available Adapters
//!
//! - [`fs_gallery`]: Directory-based gallery (implements [`GalleryProvider`])
//! - [`fs_store`]: Pictures folder with private fallback (implements [`AssetStore`])
//!
//! [`GalleryProvider`]: crate::application::port::GalleryProvider
//! [`AssetStore`]: crate::application::port::AssetStore

pub mod fs_gallery;
pub mod fs_store;

pub use fs_gallery::DirectoryGallery;
pub use fs_store::FileAssetStore;
