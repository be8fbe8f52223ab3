// SPDX-License-Identifier: MPL-2.0
//! Gallery enumeration port.

use crate::error::Result;
use chrono::{DateTime, Local};
use std::path::PathBuf;

// =============================================================================
// ImageDescriptor
// =============================================================================

/// One image in the device gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub id: u64,
    /// File name shown to the user.
    pub name: String,
    /// Path or URI used to open the image.
    pub locator: String,
    pub path: PathBuf,
    pub date_added: DateTime<Local>,
    /// Size in bytes.
    pub size: u64,
    pub folder_name: String,
}

impl ImageDescriptor {
    /// Human-readable size: `512 B`, `1.5 KB`, `2.3 MB`.
    #[must_use]
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

// =============================================================================
// FolderSummary
// =============================================================================

/// A folder holding at least one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub name: String,
    pub path: PathBuf,
    /// Newest image, used as the folder cover.
    pub first_image: Option<PathBuf>,
    pub image_count: usize,
}

// =============================================================================
// GalleryProvider Trait
// =============================================================================

/// Lists the images the user can pick from.
pub trait GalleryProvider: Send + Sync {
    /// All images, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::PermissionDenied`] without read access
    /// or [`crate::error::Error::Io`] if enumeration fails.
    fn images(&self) -> Result<Vec<ImageDescriptor>>;

    /// Folders that contain images, each with its newest image.
    ///
    /// # Errors
    ///
    /// Same as [`images`](Self::images).
    fn folders(&self) -> Result<Vec<FolderSummary>>;

    /// Images of a single folder, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`images`](Self::images).
    fn images_in(&self, folder_name: &str) -> Result<Vec<ImageDescriptor>> {
        Ok(self
            .images()?
            .into_iter()
            .filter(|image| image.folder_name == folder_name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024 + 300 * 1024), "5.3 MB");
    }
}
