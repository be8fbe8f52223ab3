// SPDX-License-Identifier: MPL-2.0
//! Asset storage port: where exported JPEGs end up.

use crate::error::Result;
use std::fmt;

/// Which store accepted the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageLocation {
    /// The user-visible pictures collection.
    Shared,
    /// App-private storage, used when the shared collection is unavailable.
    Private,
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Shared => write!(f, "shared"),
            StorageLocation::Private => write!(f, "private"),
        }
    }
}

/// A stored export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    /// Path or URI identifying the stored file.
    pub locator: String,
    pub location: StorageLocation,
}

impl SavedAsset {
    /// i18n key for the "saved" notification.
    #[must_use]
    pub fn notification_key(&self) -> &'static str {
        match self.location {
            StorageLocation::Shared => "notification-export-success",
            StorageLocation::Private => "notification-export-fallback",
        }
    }
}

/// Persists encoded images.
pub trait AssetStore: Send + Sync {
    /// Stores `bytes` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Resource`] if no location accepted the
    /// file, or [`crate::error::Error::PermissionDenied`] if writing was not
    /// permitted.
    fn store(&self, bytes: &[u8], name: &str) -> Result<SavedAsset>;
}
