// SPDX-License-Identifier: MPL-2.0
//! Application layer.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - The editor depends on ports, never on adapters
//! - The infrastructure layer implements the ports
//! - Hosts (a mobile shell, a CLI, tests) pick the adapters
//!
//! # Example
//!
//! ```ignore
//! use photo_edit::application::port::AssetStore;
//! use photo_edit::infrastructure::FileAssetStore;
//!
//! let store: Box<dyn AssetStore> = Box::new(FileAssetStore::from_config(&config));
//! let saved = session.export(store.as_ref())?;
//! ```

pub mod port;
