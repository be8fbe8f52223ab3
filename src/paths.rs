// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for application directories.
//!
//! # Path Resolution Order
//!
//! Every directory is resolved in the following priority order:
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **Environment variables** (`PHOTO_EDIT_CONFIG_DIR`, `PHOTO_EDIT_DATA_DIR`,
//!    `PHOTO_EDIT_PICTURES_DIR`, `PHOTO_EDIT_CACHE_DIR`)
//! 3. **Platform default** - via `dirs` crate
//!
//! Environment values are used as-is; platform defaults get the application
//! folder appended.

use std::path::PathBuf;

/// Application folder name for config and data directories.
const APP_NAME: &str = "PhotoEdit";

/// Folder name inside the user's Pictures directory for exported images.
pub const PICTURES_FOLDER: &str = "PhotoEdit";

/// Folder names inside the cache directory for the private export fallback.
const CACHE_APP_FOLDER: &str = "photo_edit";
const CACHE_IMAGES_FOLDER: &str = "images";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "PHOTO_EDIT_CONFIG_DIR";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "PHOTO_EDIT_DATA_DIR";

/// Environment variable to override the shared export directory.
pub const ENV_PICTURES_DIR: &str = "PHOTO_EDIT_PICTURES_DIR";

/// Environment variable to override the private export directory.
pub const ENV_CACHE_DIR: &str = "PHOTO_EDIT_CACHE_DIR";

fn resolve(
    override_path: Option<PathBuf>,
    env_var: &str,
    platform: impl FnOnce() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    platform()
}

/// Returns the application config directory (holds `settings.toml`).
///
/// - Linux: `~/.config/PhotoEdit/`
/// - macOS: `~/Library/Application Support/PhotoEdit/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\PhotoEdit\`
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the application config directory with an optional override.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_CONFIG_DIR, || {
        dirs::config_dir().map(|path| path.join(APP_NAME))
    })
}

/// Returns the application data directory.
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Returns the application data directory with an optional override.
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_DATA_DIR, || {
        dirs::data_dir().map(|path| path.join(APP_NAME))
    })
}

/// Returns the shared directory exported images are written to
/// (`<Pictures>/PhotoEdit`).
pub fn get_pictures_dir() -> Option<PathBuf> {
    get_pictures_dir_with_override(None)
}

/// Returns the shared export directory with an optional override.
pub fn get_pictures_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_PICTURES_DIR, || {
        dirs::picture_dir().map(|path| path.join(PICTURES_FOLDER))
    })
}

/// Returns the private directory used when the shared one is not writable
/// (`<cache>/photo_edit/images`).
pub fn get_private_images_dir() -> Option<PathBuf> {
    get_private_images_dir_with_override(None)
}

/// Returns the private export directory with an optional override.
pub fn get_private_images_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_CACHE_DIR, || {
        dirs::cache_dir().map(|path| path.join(CACHE_APP_FOLDER).join(CACHE_IMAGES_FOLDER))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn app_config_dir_contains_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_CONFIG_DIR);

        if let Some(path) = get_app_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }

    #[test]
    fn private_dir_ends_with_images_folder() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_CACHE_DIR);

        if let Some(path) = get_private_images_dir() {
            assert!(path.ends_with("photo_edit/images"));
        }
    }

    #[test]
    fn override_path_takes_precedence_over_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_PICTURES_DIR, "/env/pictures");

        let override_path = PathBuf::from("/override/pictures");
        let result = get_pictures_dir_with_override(Some(override_path.clone()));
        assert_eq!(result, Some(override_path));

        std::env::remove_var(ENV_PICTURES_DIR);
    }

    #[test]
    fn env_var_overrides_default_data_dir() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DATA_DIR, "/test/data/dir");

        assert_eq!(get_app_data_dir(), Some(PathBuf::from("/test/data/dir")));

        std::env::remove_var(ENV_DATA_DIR);
    }

    #[test]
    fn empty_env_var_uses_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");

        if let Some(path) = get_app_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }

        std::env::remove_var(ENV_CONFIG_DIR);
    }
}
