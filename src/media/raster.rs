// SPDX-License-Identifier: MPL-2.0
//! Owned 8-bit RGBA raster and its geometric operations.
//!
//! Every operation returns a new [`RasterImage`]; the receiver is never
//! modified. Replacing a session's working raster drops the previous buffer.

use crate::domain::editing::RotationDegrees;
use crate::domain::geometry::{Rect, Size};
use crate::error::{Error, Result, ValidationError};
use image_rs::{imageops, imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Integer crop rectangle in raster pixels. Origin may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Truncates a float rectangle to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_rect(rect: Rect) -> Self {
        let left = rect.x as i64;
        let top = rect.y as i64;
        let right = rect.right() as i64;
        let bottom = rect.bottom() as i64;
        Self::new(left, top, right - left, bottom - top)
    }

    /// Clamps to a `width`×`height` raster: the origin moves inside the
    /// raster and the extent is cut at its right/bottom edges.
    ///
    /// Returns `None` when nothing is left.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let w = (i64::from(width) - left).min(self.width);
        let h = (i64::from(height) - top).min(self.height);
        if w <= 0 || h <= 0 {
            return None;
        }
        Some((left as u32, top as u32, w as u32, h as u32))
    }
}

/// Pixel buffer for one image, 8 bits per channel, straight (not
/// premultiplied) alpha.
#[derive(Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl RasterImage {
    /// Creates a fully transparent raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Creates a raster where every pixel is `rgba`.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    /// Wraps raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the buffer length does not match the size.
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        RgbaImage::from_raw(width, height, bytes)
            .map(Self::from_image)
            .ok_or_else(|| Error::Load(format!("buffer does not hold {width}x{height} RGBA pixels")))
    }

    #[must_use]
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    #[must_use]
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_image(image.into_rgba8())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::from_pixels(self.width(), self.height())
    }

    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Reads one pixel; `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Writes one pixel; writes outside the raster are ignored.
    ///
    /// Only for building rasters; edits go through the returning operations.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(p) = self.pixels.get_pixel_mut_checked(x, y) {
            *p = Rgba(rgba);
        }
    }

    /// Returns a new raster with `f` applied to every pixel.
    #[must_use]
    pub fn map_pixels(&self, f: impl Fn([u8; 4]) -> [u8; 4]) -> Self {
        let mut out = self.pixels.clone();
        for p in out.pixels_mut() {
            p.0 = f(p.0);
        }
        Self { pixels: out }
    }

    // ==========================================================================
    // Geometry
    // ==========================================================================

    /// Extracts `rect`, clamped to the raster.
    ///
    /// When the clamped area is empty an unchanged copy is returned.
    #[must_use]
    pub fn crop(&self, rect: PixelRect) -> Self {
        match rect.clamped(self.width(), self.height()) {
            Some((x, y, w, h)) => Self {
                pixels: imageops::crop_imm(&self.pixels, x, y, w, h).to_image(),
            },
            None => self.clone(),
        }
    }

    /// Largest centered rectangle of aspect `ratio` (width / height).
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn ratio_rect(&self, ratio: f32) -> PixelRect {
        let (w, h) = (self.width(), self.height());
        let (crop_w, crop_h) = if w as f32 / h as f32 > ratio {
            ((h as f32 * ratio) as u32, h)
        } else {
            (w, (w as f32 / ratio) as u32)
        };
        PixelRect::new(
            i64::from((w - crop_w.min(w)) / 2),
            i64::from((h - crop_h.min(h)) / 2),
            i64::from(crop_w),
            i64::from(crop_h),
        )
    }

    /// Crops to the largest centered rectangle of aspect `ratio`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a non-finite or non-positive ratio.
    pub fn crop_to_ratio(&self, ratio: f32) -> Result<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ValidationError::InvalidRatio.into());
        }
        Ok(self.crop(self.ratio_rect(ratio)))
    }

    /// Mirrors along the requested axes.
    #[must_use]
    pub fn flip(&self, horizontal: bool, vertical: bool) -> Self {
        let mut pixels = if horizontal {
            imageops::flip_horizontal(&self.pixels)
        } else {
            self.pixels.clone()
        };
        if vertical {
            imageops::flip_vertical_in_place(&mut pixels);
        }
        Self { pixels }
    }

    /// Rotates clockwise around the center.
    ///
    /// Quarter turns are exact pixel permutations. Other angles resample
    /// bilinearly into the rotated bounding box; uncovered corners are
    /// transparent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the output pixmap cannot be allocated.
    pub fn rotate(&self, degrees: RotationDegrees) -> Result<Self> {
        let d = degrees.value();
        let pixels = match d {
            d if d == 0.0 => return Ok(self.clone()),
            d if d == 90.0 => imageops::rotate90(&self.pixels),
            d if d == 180.0 => imageops::rotate180(&self.pixels),
            d if d == 270.0 => imageops::rotate270(&self.pixels),
            _ => return self.rotate_arbitrary(d),
        };
        Ok(Self { pixels })
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rotate_arbitrary(&self, degrees: f32) -> Result<Self> {
        let source = self.to_pixmap()?;
        let (w, h) = (source.width() as f32, source.height() as f32);
        let radians = degrees.to_radians();
        let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
        let out_w = (w * cos + h * sin).ceil().max(1.0) as u32;
        let out_h = (w * sin + h * cos).ceil().max(1.0) as u32;

        let mut target = Pixmap::new(out_w, out_h)
            .ok_or_else(|| Error::Render(format!("cannot allocate {out_w}x{out_h} pixmap")))?;
        let transform = Transform::from_translate(-w / 2.0, -h / 2.0)
            .post_concat(Transform::from_rotate(degrees))
            .post_concat(Transform::from_translate(
                out_w as f32 / 2.0,
                out_h as f32 / 2.0,
            ));
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
        Ok(Self::from_pixmap(&target))
    }

    /// Resizes to exactly `width`×`height` (minimum 1×1).
    #[must_use]
    pub fn resize_exact(&self, width: u32, height: u32) -> Self {
        Self {
            pixels: imageops::resize(&self.pixels, width.max(1), height.max(1), FilterType::Triangle),
        }
    }

    /// Scales down to fit inside a `max_edge`×`max_edge` square, keeping the
    /// aspect ratio. Smaller rasters are returned as a copy.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn thumbnail(&self, max_edge: u32) -> Self {
        let (w, h) = self.dimensions();
        let longest = w.max(h);
        if longest <= max_edge || longest == 0 {
            return self.clone();
        }
        let factor = f64::from(max_edge) / f64::from(longest);
        let tw = (f64::from(w) * factor).round() as u32;
        let th = (f64::from(h) * factor).round() as u32;
        self.resize_exact(tw, th)
    }

    // ==========================================================================
    // tiny-skia interop
    // ==========================================================================

    /// Converts to a premultiplied pixmap for compositing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] for an empty raster.
    pub fn to_pixmap(&self) -> Result<Pixmap> {
        let mut pixmap = Pixmap::new(self.width(), self.height())
            .ok_or_else(|| Error::Render("cannot create pixmap for empty raster".into()))?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(self.pixels.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(pixmap)
    }

    /// Converts a premultiplied pixmap back to straight alpha.
    #[must_use]
    pub fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut pixels = RgbaImage::new(pixmap.width(), pixmap.height());
        for (dst, src) in pixels.pixels_mut().zip(pixmap.pixels()) {
            let c: ColorU8 = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Self { pixels }
    }
}
