// SPDX-License-Identifier: MPL-2.0
//! JPEG encoding for exported images.

use crate::error::{Error, Result};
use crate::media::RasterImage;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{DynamicImage, ExtendedColorType};
use std::io::Write;

/// Encodes `image` as JPEG into `writer`. Alpha is dropped.
///
/// # Errors
///
/// Returns [`Error::Resource`] if encoding or writing fails.
pub fn write_jpeg<W: Write>(image: &RasterImage, quality: u8, writer: W) -> Result<()> {
    let rgb = DynamicImage::ImageRgba8(image.as_image().clone()).into_rgb8();
    let mut encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100));
    encoder
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| Error::Resource(format!("JPEG encoding failed: {e}")))
}

/// Encodes `image` as JPEG in memory.
///
/// # Errors
///
/// Returns [`Error::Resource`] if encoding fails.
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_jpeg(image, quality, &mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_bytes_are_jpeg() {
        let image = RasterImage::filled(8, 8, [200, 10, 10, 255]);
        let bytes = encode_jpeg(&image, 90).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image_rs::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn lower_quality_is_smaller() {
        let mut image = RasterImage::new(64, 64);
        for y in 0..64 {
            for x in 0..64 {
                image.put_pixel(x, y, [(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8, 255]);
            }
        }
        let high = encode_jpeg(&image, 95).unwrap();
        let low = encode_jpeg(&image, 20).unwrap();
        assert!(low.len() < high.len());
    }
}
