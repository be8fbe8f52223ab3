// SPDX-License-Identifier: MPL-2.0
//! Pixel-level media handling: the raster buffer, color adjustment,
//! decoding and JPEG encoding.

pub mod color;
pub mod decode;
pub mod encode;
pub mod raster;

pub use color::{BrightnessMode, ColorMatrix, FilterKind};
pub use decode::{decode_bytes, decode_file, DecodeOptions};
pub use encode::{encode_jpeg, write_jpeg};
pub use extensions::IMAGE_EXTENSIONS;
pub use raster::{PixelRect, RasterImage};

use std::path::Path;

/// Supported file extensions
pub mod extensions {
    /// Image file extensions the decoder accepts.
    pub const IMAGE_EXTENSIONS: &[&str] =
        &["jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp"];
}

/// Returns whether `path` has a decodable image extension (case-insensitive).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
