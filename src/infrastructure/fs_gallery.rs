// SPDX-License-Identifier: MPL-2.0
//! Filesystem [`GalleryProvider`] rooted at one pictures directory.
//!
//! Images directly in the root and in its immediate subfolders are listed;
//! deeper folders are ignored. Unreadable entries are skipped.

use crate::application::port::{
    require, FolderSummary, GalleryProvider, ImageDescriptor, PermissionGate,
};
use crate::error::{Permission, Result};
use crate::media;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

pub struct DirectoryGallery {
    root: PathBuf,
    gate: Option<Arc<dyn PermissionGate>>,
}

impl std::fmt::Debug for DirectoryGallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryGallery")
            .field("root", &self.root)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

impl DirectoryGallery {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            gate: None,
        }
    }

    /// Asks `gate` for read access before every listing.
    #[must_use]
    pub fn with_permission_gate(mut self, gate: Arc<dyn PermissionGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn check_access(&self) -> Result<()> {
        match &self.gate {
            Some(gate) => require(gate.as_ref(), Permission::ReadImages),
            None => Ok(()),
        }
    }

    fn scan(&self) -> Result<Vec<ImageDescriptor>> {
        let mut found = Vec::new();
        collect_images(&self.root, &mut found)?;
        for entry in fs::read_dir(&self.root)?.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Err(e) = collect_images(&path, &mut found) {
                    log::debug!("skipping {}: {e}", path.display());
                }
            }
        }

        found.sort_by(|a, b| b.date_added.cmp(&a.date_added).then_with(|| a.name.cmp(&b.name)));
        for (index, image) in found.iter_mut().enumerate() {
            image.id = index as u64 + 1;
        }
        Ok(found)
    }
}

fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn collect_images(dir: &Path, out: &mut Vec<ImageDescriptor>) -> Result<()> {
    let folder = folder_name(dir);
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if !path.is_file() || !media::is_supported_image(&path) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        out.push(ImageDescriptor {
            id: 0,
            name: folder_name(&path),
            locator: path.to_string_lossy().into_owned(),
            date_added: DateTime::<Local>::from(modified),
            size: metadata.len(),
            folder_name: folder.clone(),
            path,
        });
    }
    Ok(())
}

impl GalleryProvider for DirectoryGallery {
    fn images(&self) -> Result<Vec<ImageDescriptor>> {
        self.check_access()?;
        let images = self.scan()?;
        log::debug!("{} images under {}", images.len(), self.root.display());
        Ok(images)
    }

    fn folders(&self) -> Result<Vec<FolderSummary>> {
        self.check_access()?;
        // Keyed by directory: a subfolder may share the root's name.
        let mut folders: BTreeMap<PathBuf, FolderSummary> = BTreeMap::new();
        // Newest first, so the first image seen per folder is its cover.
        for image in self.scan()? {
            let parent = image.path.parent().map(Path::to_path_buf).unwrap_or_default();
            let summary = folders
                .entry(parent.clone())
                .or_insert_with(|| FolderSummary {
                    name: image.folder_name.clone(),
                    path: parent,
                    first_image: Some(image.path.clone()),
                    image_count: 0,
                });
            summary.image_count += 1;
        }
        Ok(folders.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::time::Duration;
    use tempfile::tempdir;

    fn touch(path: &Path, age_secs: u64) {
        fs::write(path, b"not decoded").unwrap();
        let when = SystemTime::now() - Duration::from_secs(age_secs);
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(when)
            .unwrap();
    }

    #[test]
    fn lists_images_newest_first() {
        let temp = tempdir().unwrap();
        let camera = temp.path().join("Camera");
        fs::create_dir(&camera).unwrap();
        touch(&temp.path().join("old.jpg"), 300);
        touch(&camera.join("new.PNG"), 10);
        touch(&camera.join("mid.webp"), 100);
        touch(&camera.join("notes.txt"), 1);

        let images = DirectoryGallery::new(temp.path()).images().unwrap();
        let names: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["new.PNG", "mid.webp", "old.jpg"]);
        assert_eq!(images[0].folder_name, "Camera");
        assert_eq!(images[0].id, 1);
        assert_eq!(images[0].size, 11);
    }

    #[test]
    fn folders_carry_newest_cover_and_count() {
        let temp = tempdir().unwrap();
        let shots = temp.path().join("Shots");
        fs::create_dir(&shots).unwrap();
        touch(&shots.join("a.jpg"), 50);
        touch(&shots.join("b.jpg"), 5);

        let gallery = DirectoryGallery::new(temp.path());
        let folders = gallery.folders().unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "Shots");
        assert_eq!(folders[0].image_count, 2);
        assert_eq!(folders[0].first_image, Some(shots.join("b.jpg")));
        assert_eq!(gallery.images_in("Shots").unwrap().len(), 2);
        assert!(gallery.images_in("Other").unwrap().is_empty());
    }

    #[test]
    fn same_named_folders_stay_apart() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("Shots");
        let nested = root.join("Shots");
        fs::create_dir_all(&nested).unwrap();
        touch(&root.join("top.jpg"), 20);
        touch(&nested.join("inner.jpg"), 10);

        let folders = DirectoryGallery::new(&root).folders().unwrap();
        assert_eq!(folders.len(), 2);
        assert!(folders.iter().all(|f| f.name == "Shots" && f.image_count == 1));
        let paths: Vec<_> = folders.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![root.clone(), nested.clone()]);
    }

    #[test]
    fn refused_read_permission() {
        struct Deny;
        impl PermissionGate for Deny {
            fn request(&self, _: Permission) -> bool {
                false
            }
        }
        let temp = tempdir().unwrap();
        let gallery = DirectoryGallery::new(temp.path()).with_permission_gate(Arc::new(Deny));
        assert_eq!(
            gallery.images(),
            Err(Error::PermissionDenied(Permission::ReadImages))
        );
    }

    #[test]
    fn missing_root_is_io_error() {
        let gallery = DirectoryGallery::new("/definitely/not/here");
        assert!(matches!(gallery.images(), Err(Error::Io(_))));
    }
}
