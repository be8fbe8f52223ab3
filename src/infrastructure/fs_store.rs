// SPDX-License-Identifier: MPL-2.0
//! Filesystem [`AssetStore`]: shared pictures folder first, private cache
//! folder as fallback.

use crate::application::port::{require, AssetStore, PermissionGate, SavedAsset, StorageLocation};
use crate::config::Config;
use crate::error::{Error, Permission, Result};
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Suffix of the in-progress file; renamed away once fully written.
const PARTIAL_SUFFIX: &str = ".part";

pub struct FileAssetStore {
    shared_dir: Option<PathBuf>,
    private_dir: Option<PathBuf>,
    fallback_to_private: bool,
    gate: Option<Arc<dyn PermissionGate>>,
}

impl std::fmt::Debug for FileAssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAssetStore")
            .field("shared_dir", &self.shared_dir)
            .field("private_dir", &self.private_dir)
            .field("fallback_to_private", &self.fallback_to_private)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

impl FileAssetStore {
    /// Uses the platform directories from [`paths`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            shared_dir: paths::get_pictures_dir(),
            private_dir: paths::get_private_images_dir(),
            fallback_to_private: config.export.fallback_to_private.unwrap_or(true),
            gate: None,
        }
    }

    #[must_use]
    pub fn with_dirs(shared_dir: Option<PathBuf>, private_dir: Option<PathBuf>) -> Self {
        Self {
            shared_dir,
            private_dir,
            fallback_to_private: true,
            gate: None,
        }
    }

    /// Asks `gate` for write access before touching the shared folder.
    #[must_use]
    pub fn with_permission_gate(mut self, gate: Arc<dyn PermissionGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_private = enabled;
        self
    }

    fn store_shared(&self, bytes: &[u8], name: &str) -> Result<PathBuf> {
        if let Some(gate) = &self.gate {
            require(gate.as_ref(), Permission::WriteImages)?;
        }
        let dir = self
            .shared_dir
            .as_deref()
            .ok_or_else(|| Error::Resource("no shared pictures directory".into()))?;
        write_atomic(dir, name, bytes)
    }

    fn store_private(&self, bytes: &[u8], name: &str) -> Result<PathBuf> {
        let dir = self
            .private_dir
            .as_deref()
            .ok_or_else(|| Error::Resource("no private images directory".into()))?;
        write_atomic(dir, name, bytes)
    }
}

impl AssetStore for FileAssetStore {
    fn store(&self, bytes: &[u8], name: &str) -> Result<SavedAsset> {
        let shared_err = match self.store_shared(bytes, name) {
            Ok(path) => return Ok(saved(&path, StorageLocation::Shared)),
            Err(e) => e,
        };
        if !self.fallback_to_private {
            return Err(shared_err);
        }

        log::warn!("shared export failed ({shared_err}), falling back to private storage");
        match self.store_private(bytes, name) {
            Ok(path) => Ok(saved(&path, StorageLocation::Private)),
            Err(private_err) => Err(Error::Resource(format!(
                "export failed: {shared_err}; fallback: {private_err}"
            ))),
        }
    }
}

fn saved(path: &Path, location: StorageLocation) -> SavedAsset {
    SavedAsset {
        locator: path.to_string_lossy().into_owned(),
        location,
    }
}

/// Writes `<dir>/<name>.part`, then renames it to `<dir>/<name>`.
fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let target = dir.join(name);
    let partial = dir.join(format!("{name}{PARTIAL_SUFFIX}"));
    if let Err(e) = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, &target)) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(target)
}
