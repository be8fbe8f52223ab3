// SPDX-License-Identifier: MPL-2.0
//! Watermark stamped onto exported images.

use super::text::{RgbaColor, Shadow, TextRun};
use crate::config::{
    WatermarkConfig, BADGE_WATERMARK_FONT_SIZE, BADGE_WATERMARK_PADDING,
    DEFAULT_WATERMARK_FONT_SIZE, DEFAULT_WATERMARK_OPACITY, DEFAULT_WATERMARK_PADDING,
    DEFAULT_WATERMARK_TEXT, TILED_WATERMARK_OPACITY,
};
use crate::domain::editing::Opacity;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tiny_skia::{Color, Paint, Pixmap, PixmapPaint, Rect, Transform};

/// How the watermark text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkStyle {
    /// Single line in the bottom-right corner.
    #[default]
    Text,
    /// Faint grid across the whole image, every other row shifted.
    Tiled,
    /// Bottom-right label on a translucent black box.
    Badge,
}

/// Watermark text and appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    pub text: String,
    pub style: WatermarkStyle,
    pub font_size: f32,
    pub opacity: Opacity,
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            text: DEFAULT_WATERMARK_TEXT.to_owned(),
            style: WatermarkStyle::Text,
            font_size: DEFAULT_WATERMARK_FONT_SIZE,
            opacity: Opacity::new(DEFAULT_WATERMARK_OPACITY),
        }
    }
}

impl Watermark {
    /// Builds the watermark described by `config`, or `None` when disabled
    /// or blank.
    #[must_use]
    pub fn from_config(config: &WatermarkConfig) -> Option<Self> {
        if !config.enabled.unwrap_or(true) {
            return None;
        }
        let text = config
            .text
            .clone()
            .unwrap_or_else(|| DEFAULT_WATERMARK_TEXT.to_owned());
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text,
            style: config.style.unwrap_or_default(),
            font_size: config
                .font_size
                .filter(|size| size.is_finite() && *size > 0.0)
                .unwrap_or(DEFAULT_WATERMARK_FONT_SIZE),
            opacity: Opacity::new(config.opacity.unwrap_or(DEFAULT_WATERMARK_OPACITY)),
        })
    }

    /// Draws the watermark into `target` (raster space).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Render`] if the text cannot be rasterized.
    pub fn stamp(&self, target: &mut Pixmap) -> Result<()> {
        log::debug!("stamping {:?} watermark", self.style);
        match self.style {
            WatermarkStyle::Text => self.stamp_corner(target),
            WatermarkStyle::Tiled => self.stamp_tiled(target),
            WatermarkStyle::Badge => self.stamp_badge(target),
        }
    }

    fn stamp_corner(&self, target: &mut Pixmap) -> Result<()> {
        let run = TextRun::bold(&self.text, self.font_size, RgbaColor::WHITE)
            .with_shadow(Shadow::default());
        let text = run.rasterize()?;
        let (w, h) = canvas_size(target);

        let x = w - run.text_width() - DEFAULT_WATERMARK_PADDING;
        let baseline = h - DEFAULT_WATERMARK_PADDING;
        draw_text(target, &text, &run, x, baseline, self.opacity);
        Ok(())
    }

    fn stamp_tiled(&self, target: &mut Pixmap) -> Result<()> {
        let run = TextRun::bold(&self.text, self.font_size, RgbaColor::WHITE).with_shadow(
            Shadow {
                blur: 2.0,
                ..Shadow::default()
            },
        );
        let text_width = run.text_width();
        if text_width <= 0.0 {
            return Ok(());
        }
        let text = run.rasterize()?;
        let (w, h) = canvas_size(target);
        let opacity = Opacity::new(TILED_WATERMARK_OPACITY);

        let text_height = self.font_size;
        let horizontal = text_width * 1.5;
        let vertical = text_height * 2.0;

        let mut baseline = text_height;
        let mut row = 0u32;
        while baseline < h {
            let shift = if row % 2 == 1 { text_width / 2.0 } else { 0.0 };
            let mut x = 0.0;
            while x < w {
                draw_text(target, &text, &run, x + shift, baseline, opacity);
                x += horizontal;
            }
            baseline += vertical;
            row += 1;
        }
        Ok(())
    }

    fn stamp_badge(&self, target: &mut Pixmap) -> Result<()> {
        let run = TextRun::bold(&self.text, BADGE_WATERMARK_FONT_SIZE, RgbaColor::WHITE).regular();
        let text = run.rasterize()?;
        let (w, h) = canvas_size(target);
        let pad = BADGE_WATERMARK_PADDING;

        let left = w - run.text_width() - pad * 2.0;
        let top = h - BADGE_WATERMARK_FONT_SIZE - pad;
        let right = w - pad;
        let bottom = h - pad;
        if let Some(rect) = Rect::from_ltrb(left.max(0.0), top.max(0.0), right, bottom) {
            let mut paint = Paint::default();
            paint.set_color(Color::from_rgba8(0, 0, 0, 0x80));
            target.fill_rect(rect, &paint, Transform::identity(), None);
        }

        draw_text(target, &text, &run, left + pad, bottom - pad, Opacity::OPAQUE);
        Ok(())
    }
}

fn canvas_size(target: &Pixmap) -> (f32, f32) {
    (target.width() as f32, target.height() as f32)
}

/// Places a rasterized run so that its first line starts at `(x, baseline)`.
fn draw_text(
    target: &mut Pixmap,
    text: &Pixmap,
    run: &TextRun<'_>,
    x: f32,
    baseline: f32,
    opacity: Opacity,
) {
    let paint = PixmapPaint {
        opacity: opacity.value(),
        ..PixmapPaint::default()
    };
    let origin = Transform::from_translate(x - run.padding(), baseline - run.baseline());
    target.draw_pixmap(0, 0, text.as_ref(), &paint, origin, None);
}
