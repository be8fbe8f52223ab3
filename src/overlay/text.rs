// SPDX-License-Identifier: MPL-2.0
//! Text overlay content and its rasterization.
//!
//! Text is laid out into a small SVG document and rendered with resvg, using
//! the system font database. Layout size is estimated from the character
//! classes alone so that layer bounds stay stable even on hosts without the
//! requested font.

use super::LayerState;
use crate::domain::editing::TextSize;
use crate::domain::geometry::Size;
use crate::error::{Error, Result, ValidationError};
use quick_xml::escape::escape;
use resvg::usvg;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};
use tiny_skia::{Pixmap, Transform};

/// Advance of an ASCII glyph, in ems.
const NARROW_ADVANCE: f32 = 0.6;
/// Advance of any other glyph (CJK, emoji), in ems.
const WIDE_ADVANCE: f32 = 1.0;
const LINE_HEIGHT: f32 = 1.25;
/// Height of the first baseline below the line top, in ems.
const ASCENT: f32 = 0.95;
/// Room around the glyphs for the drop shadow, in ems.
const PADDING: f32 = 0.25;

// =============================================================================
// Style
// =============================================================================

/// Typeface choices offered for text overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    Default,
    Bold,
    Serif,
    SansSerif,
    Monospace,
}

impl FontFamily {
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Default,
        FontFamily::Bold,
        FontFamily::Serif,
        FontFamily::SansSerif,
        FontFamily::Monospace,
    ];

    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            FontFamily::Default => "font-default",
            FontFamily::Bold => "font-bold",
            FontFamily::Serif => "font-serif",
            FontFamily::SansSerif => "font-sans-serif",
            FontFamily::Monospace => "font-monospace",
        }
    }

    fn css_family(self) -> &'static str {
        match self {
            FontFamily::Serif => "serif",
            FontFamily::Monospace => "monospace",
            FontFamily::Default | FontFamily::Bold | FontFamily::SansSerif => "sans-serif",
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, FontFamily::Bold)
    }
}

/// Straight-alpha color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const WHITE: RgbaColor = RgbaColor::new(255, 255, 255, 255);
    pub const BLACK: RgbaColor = RgbaColor::new(0, 0, 0, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, alpha excluded.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    #[must_use]
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Blurred offset shadow drawn under glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            blur: 3.0,
            dx: 1.0,
            dy: 1.0,
        }
    }
}

/// Visual style of a text overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontFamily,
    pub size: TextSize,
    pub color: RgbaColor,
    pub shadow: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontFamily::default(),
            size: TextSize::default(),
            color: RgbaColor::WHITE,
            shadow: true,
        }
    }
}

// =============================================================================
// Layer
// =============================================================================

/// A text overlay: a string plus its style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub(crate) state: LayerState,
    text: String,
    pub style: TextStyle,
}

impl TextLayer {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] for blank text.
    pub(crate) fn new(state: LayerState, text: &str, style: TextStyle) -> Result<Self> {
        Ok(Self {
            state,
            text: validate_text(text)?.to_owned(),
            style,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] for blank text; the layer keeps
    /// its previous string.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = validate_text(text)?.to_owned();
        Ok(())
    }

    /// Unscaled bounds of the rendered text.
    #[must_use]
    pub fn local_size(&self) -> Size {
        TextRun::from_layer(self).measure()
    }

    pub(crate) fn rasterize(&self) -> Result<Pixmap> {
        TextRun::from_layer(self).rasterize()
    }
}

fn validate_text(text: &str) -> Result<&str> {
    if text.trim().is_empty() {
        Err(ValidationError::EmptyText.into())
    } else {
        Ok(text)
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// One block of text ready to be measured or drawn.
#[derive(Debug, Clone)]
pub(crate) struct TextRun<'a> {
    pub text: &'a str,
    pub family: &'static str,
    pub bold: bool,
    pub size: f32,
    pub color: RgbaColor,
    pub shadow: Option<Shadow>,
}

impl<'a> TextRun<'a> {
    fn from_layer(layer: &'a TextLayer) -> Self {
        Self {
            text: &layer.text,
            family: layer.style.font.css_family(),
            bold: layer.style.font.is_bold(),
            size: layer.style.size.value(),
            color: layer.style.color,
            shadow: layer.style.shadow.then(Shadow::default),
        }
    }

    /// Bold sans-serif run, as used by watermarks.
    pub fn bold(text: &'a str, size: f32, color: RgbaColor) -> Self {
        Self {
            text,
            family: FontFamily::Bold.css_family(),
            bold: true,
            size,
            color,
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn regular(mut self) -> Self {
        self.bold = false;
        self
    }

    fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.text.split('\n')
    }

    /// Width of the widest line without padding.
    pub fn text_width(&self) -> f32 {
        self.lines()
            .map(|line| {
                line.chars()
                    .map(|c| if c.is_ascii() { NARROW_ADVANCE } else { WIDE_ADVANCE })
                    .sum::<f32>()
                    * self.size
            })
            .fold(0.0, f32::max)
    }

    pub fn padding(&self) -> f32 {
        (self.size * PADDING).ceil()
    }

    /// Distance from the top of the padded block to the first baseline.
    pub fn baseline(&self) -> f32 {
        self.padding() + self.size * ASCENT
    }

    /// Padded bounds of the rendered block.
    pub fn measure(&self) -> Size {
        let line_count = self.lines().count().max(1) as f32;
        let pad = self.padding() * 2.0;
        Size::new(
            (self.text_width() + pad).ceil(),
            (line_count * self.size * LINE_HEIGHT + pad).ceil(),
        )
    }

    fn to_svg(&self, size: Size) -> String {
        let pad = self.padding();
        let line_height = self.size * LINE_HEIGHT;
        let first_baseline = self.baseline();

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            size.width, size.height
        );
        let filter = if let Some(shadow) = self.shadow {
            let _ = write!(
                svg,
                concat!(
                    r#"<defs><filter id="shadow" x="-50%" y="-50%" width="200%" height="200%">"#,
                    r#"<feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="black"/>"#,
                    r#"</filter></defs>"#
                ),
                shadow.dx,
                shadow.dy,
                shadow.blur / 2.0
            );
            r#" filter="url(#shadow)""#
        } else {
            ""
        };
        let _ = write!(
            svg,
            r#"<text font-family="{}" font-size="{}" font-weight="{}" fill="{}" fill-opacity="{}" xml:space="preserve"{}>"#,
            self.family,
            self.size,
            if self.bold { "bold" } else { "normal" },
            self.color.to_hex(),
            self.color.opacity(),
            filter
        );
        for (index, line) in self.lines().enumerate() {
            let _ = write!(
                svg,
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                pad,
                first_baseline + index as f32 * line_height,
                escape(line)
            );
        }
        svg.push_str("</text></svg>");
        svg
    }

    /// Renders the run into a pixmap of exactly [`Self::measure`] pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the SVG cannot be parsed or the pixmap
    /// cannot be allocated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rasterize(&self) -> Result<Pixmap> {
        let size = self.measure();
        let mut pixmap = Pixmap::new(size.width as u32, size.height as u32)
            .ok_or_else(|| Error::Render(format!("cannot allocate text pixmap {size:?}")))?;

        let options = usvg::Options {
            fontdb: font_database(),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&self.to_svg(size), &options)
            .map_err(|e| Error::Render(format!("text layout failed: {e}")))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

/// System fonts, loaded once per process.
pub(crate) fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            bind_generic_families(&mut db);
            log::debug!("loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Points unresolvable generic families at the first installed face.
fn bind_generic_families(db: &mut usvg::fontdb::Database) {
    use usvg::fontdb::{Family, Query};

    let Some(fallback) = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
    else {
        log::warn!("no system fonts found; text overlays will render empty");
        return;
    };
    let resolves = |db: &usvg::fontdb::Database, family: Family<'_>| {
        db.query(&Query {
            families: &[family],
            ..Query::default()
        })
        .is_some()
    };
    if !resolves(db, Family::SansSerif) {
        db.set_sans_serif_family(fallback.clone());
    }
    if !resolves(db, Family::Serif) {
        db.set_serif_family(fallback.clone());
    }
    if !resolves(db, Family::Monospace) {
        db.set_monospace_family(fallback);
    }
}

/// Whether any font is installed.
#[must_use]
pub fn fonts_available() -> bool {
    !font_database().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{LayerId, LayerTransform};

    fn layer(text: &str) -> TextLayer {
        TextLayer::new(
            LayerState::new(LayerId::new(1), LayerTransform::default()),
            text,
            TextStyle::default(),
        )
        .unwrap()
    }

    #[test]
    fn blank_text_is_rejected() {
        let state = LayerState::new(LayerId::new(1), LayerTransform::default());
        let err = TextLayer::new(state, "  \n", TextStyle::default()).unwrap_err();
        assert_eq!(err, Error::Validation(ValidationError::EmptyText));
    }

    #[test]
    fn set_text_keeps_previous_on_error() {
        let mut text = layer("hello");
        assert!(text.set_text("").is_err());
        assert_eq!(text.text(), "hello");
        text.set_text("bye").unwrap();
        assert_eq!(text.text(), "bye");
    }

    #[test]
    fn wide_characters_measure_wider() {
        let ascii = layer("abcd").local_size();
        let cjk = layer("训练营练").local_size();
        assert!(cjk.width > ascii.width);
        assert_eq!(cjk.height, ascii.height);
    }

    #[test]
    fn multiline_text_is_taller() {
        let one = layer("ab").local_size();
        let two = layer("ab\nab").local_size();
        assert_eq!(one.width, two.width);
        assert!(two.height > one.height);
    }

    #[test]
    fn svg_escapes_markup() {
        let text = layer("<b>&");
        let run = TextRun::from_layer(&text);
        let svg = run.to_svg(run.measure());
        assert!(svg.contains("&lt;b&gt;&amp;"));
        assert!(svg.contains("feDropShadow"));
    }

    #[test]
    fn rasterized_text_has_measured_size() {
        let text = layer("Hi");
        let size = text.local_size();
        let pixmap = text.rasterize().unwrap();
        assert_eq!(pixmap.width() as f32, size.width);
        assert_eq!(pixmap.height() as f32, size.height);
    }

    #[test]
    fn color_hex_ignores_alpha() {
        assert_eq!(RgbaColor::new(255, 16, 0, 10).to_hex(), "#ff1000");
        assert_eq!(RgbaColor::default(), RgbaColor::WHITE);
    }
}
