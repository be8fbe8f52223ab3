// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for the editor's external collaborators.
//!
//! Infrastructure adapters implement these traits; the editor only ever sees
//! the traits and the plain data types defined next to them.
//!
//! # Available Ports
//!
//! - [`capture`]: Camera capture
//! - [`gallery`]: Gallery enumeration (images and folders)
//! - [`permission`]: Platform permission prompts
//! - [`storage`]: Storing exported images
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync` so adapters can be shared with background jobs
//! - Methods are blocking; callers move them onto the task slot when needed

pub mod capture;
pub mod gallery;
pub mod permission;
pub mod storage;

pub use capture::{CameraCapture, CapturedImage};
pub use gallery::{FolderSummary, GalleryProvider, ImageDescriptor};
pub use permission::{require, PermissionGate};
pub use storage::{AssetStore, SavedAsset, StorageLocation};
