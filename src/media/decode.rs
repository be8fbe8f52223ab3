// SPDX-License-Identifier: MPL-2.0
//! Source image decoding with EXIF orientation and power-of-two downsampling.

use crate::config::{Config, DEFAULT_MAX_DECODE_DIMENSION};
use crate::error::{Error, Result};
use crate::media::RasterImage;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Knobs for [`decode_file`] / [`decode_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Neither side of the result exceeds this after downsampling.
    pub max_dimension: u32,
    pub apply_exif_orientation: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DECODE_DIMENSION,
            apply_exif_orientation: true,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_dimension: config.max_decode_dimension(),
            apply_exif_orientation: config.decode.apply_exif_orientation.unwrap_or(true),
        }
    }
}

/// Decodes the image at `path`.
///
/// # Errors
///
/// Returns [`Error::Load`] if the file cannot be read or decoded.
pub fn decode_file<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<RasterImage> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;
    decode_bytes(&bytes, options)
}

/// Decodes an in-memory encoded image (JPEG, PNG, WebP, ...).
///
/// # Errors
///
/// Returns [`Error::Load`] if the bytes are not a supported image.
pub fn decode_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<RasterImage> {
    let decoded = image_rs::load_from_memory(bytes)?;
    let mut image = RasterImage::from_dynamic(decoded);

    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Load("image has empty dimensions".into()));
    }

    if options.apply_exif_orientation {
        if let Some(orientation) = read_exif_orientation(bytes) {
            image = apply_orientation(&image, orientation);
        }
    }

    let factor = sample_factor(image.width(), image.height(), options.max_dimension);
    if factor > 1 {
        log::debug!(
            "downsampling {}x{} by {}",
            image.width(),
            image.height(),
            factor
        );
        image = image.resize_exact(image.width() / factor, image.height() / factor);
    }
    Ok(image)
}

/// Smallest power of two `n` with `width/n ≤ max` and `height/n ≤ max`.
#[must_use]
pub fn sample_factor(width: u32, height: u32, max_dimension: u32) -> u32 {
    let max_dimension = max_dimension.max(1);
    let mut factor = 1u32;
    while width / factor > max_dimension || height / factor > max_dimension {
        factor *= 2;
    }
    factor
}

/// Reads the EXIF orientation tag (1–8), if present.
#[must_use]
pub fn read_exif_orientation(bytes: &[u8]) -> Option<u32> {
    let reader = exif::Reader::new();
    let data = reader.read_from_container(&mut Cursor::new(bytes)).ok()?;
    let field = data.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0).filter(|v| (1..=8).contains(v))
}

/// Rotates/mirrors `image` so that EXIF `orientation` becomes 1.
#[must_use]
pub fn apply_orientation(image: &RasterImage, orientation: u32) -> RasterImage {
    use image_rs::imageops;

    let pixels = image.as_image();
    let oriented = match orientation {
        2 => imageops::flip_horizontal(pixels),
        3 => imageops::rotate180(pixels),
        4 => imageops::flip_vertical(pixels),
        5 => imageops::flip_horizontal(&imageops::rotate90(pixels)),
        6 => imageops::rotate90(pixels),
        7 => imageops::flip_horizontal(&imageops::rotate270(pixels)),
        8 => imageops::rotate270(pixels),
        _ => return image.clone(),
    };
    RasterImage::from_image(oriented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image_rs::RgbaImage::from_pixel(width, height, image_rs::Rgba([9, 8, 7, 255]));
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, image_rs::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn sample_factor_uses_power_of_two_steps() {
        assert_eq!(sample_factor(4000, 3000, 2048), 2);
        assert_eq!(sample_factor(2048, 2048, 2048), 1);
        assert_eq!(sample_factor(2049, 10, 2048), 2);
        assert_eq!(sample_factor(9000, 100, 2048), 8);
        assert_eq!(sample_factor(100, 100, 2048), 1);
    }

    #[test]
    fn small_image_is_not_downsampled() {
        let image = decode_bytes(&png_bytes(40, 20), &DecodeOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(image.pixel(0, 0), Some([9, 8, 7, 255]));
    }

    #[test]
    fn configured_limit_downsamples() {
        let options = DecodeOptions {
            max_dimension: 16,
            ..DecodeOptions::default()
        };
        let image = decode_bytes(&png_bytes(64, 32), &options).unwrap();
        assert_eq!(image.dimensions(), (16, 8));
    }

    #[test]
    fn corrupt_bytes_fail_to_load() {
        match decode_bytes(b"not an image", &DecodeOptions::default()) {
            Err(Error::Load(message)) => assert!(!message.is_empty()),
            other => panic!("expected Load error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempdir().expect("temp dir");
        let result = decode_file(dir.path().join("nope.jpg"), &DecodeOptions::default());
        assert!(matches!(result, Err(Error::Load(_))));
    }

    #[test]
    fn png_without_exif_has_no_orientation() {
        assert_eq!(read_exif_orientation(&png_bytes(4, 4)), None);
    }

    #[test]
    fn orientation_six_rotates_clockwise() {
        let mut image = RasterImage::new(3, 2);
        image.put_pixel(0, 1, [255, 0, 0, 255]);
        let upright = apply_orientation(&image, 6);
        assert_eq!(upright.dimensions(), (2, 3));
        assert_eq!(upright.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn orientation_one_is_identity() {
        let image = RasterImage::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(apply_orientation(&image, 1), image);
    }
}
