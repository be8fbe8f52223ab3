// SPDX-License-Identifier: MPL-2.0
//! Sticker catalog: embedded SVG assets rasterized on demand.

use super::LayerState;
use crate::config::STICKER_CACHE_CAPACITY;
use crate::domain::geometry::Size;
use crate::error::{Error, Result, ValidationError};
use lru::LruCache;
use resvg::usvg;
use rust_embed::RustEmbed;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tiny_skia::{Pixmap, Transform};

#[derive(RustEmbed)]
#[folder = "assets/stickers/"]
struct StickerAssets;

/// The fixed set of stickers bundled with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StickerId {
    Heart,
    Star,
    Smile,
    Arrow,
    Flower,
    Music,
    Sun,
    Moon,
    Crown,
    Bubble,
}

impl StickerId {
    /// Catalog order, as shown in the picker.
    pub const ALL: [StickerId; 10] = [
        StickerId::Heart,
        StickerId::Star,
        StickerId::Smile,
        StickerId::Arrow,
        StickerId::Flower,
        StickerId::Music,
        StickerId::Sun,
        StickerId::Moon,
        StickerId::Crown,
        StickerId::Bubble,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StickerId::Heart => "heart",
            StickerId::Star => "star",
            StickerId::Smile => "smile",
            StickerId::Arrow => "arrow",
            StickerId::Flower => "flower",
            StickerId::Music => "music",
            StickerId::Sun => "sun",
            StickerId::Moon => "moon",
            StickerId::Crown => "crown",
            StickerId::Bubble => "bubble",
        }
    }

    fn asset_path(self) -> String {
        format!("{}.svg", self.name())
    }
}

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StickerId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StickerId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| ValidationError::UnknownSticker(s.to_owned()).into())
    }
}

/// A sticker placed on the image.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerLayer {
    pub(crate) state: LayerState,
    sticker: StickerId,
    size: Size,
}

impl StickerLayer {
    pub(crate) fn new(state: LayerState, sticker: StickerId, size: Size) -> Self {
        Self {
            state,
            sticker,
            size,
        }
    }

    #[must_use]
    pub fn sticker(&self) -> StickerId {
        self.sticker
    }

    /// Intrinsic size of the sticker asset.
    #[must_use]
    pub fn local_size(&self) -> Size {
        self.size
    }
}

/// Parses sticker SVGs and caches their rasterized pixmaps.
///
/// Shared between a session and its export jobs, hence the interior lock.
pub struct StickerCatalog {
    cache: Mutex<LruCache<StickerId, Arc<Pixmap>>>,
}

impl fmt::Debug for StickerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickerCatalog")
            .field("cached", &self.cached_count())
            .finish()
    }
}

impl Default for StickerCatalog {
    fn default() -> Self {
        Self::with_capacity(STICKER_CACHE_CAPACITY)
    }
}

impl StickerCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn tree(id: StickerId) -> Result<usvg::Tree> {
        let asset = StickerAssets::get(&id.asset_path())
            .ok_or_else(|| Error::Render(format!("sticker asset missing: {id}")))?;
        usvg::Tree::from_data(&asset.data, &usvg::Options::default())
            .map_err(|e| Error::Render(format!("invalid sticker {id}: {e}")))
    }

    /// Size declared by the sticker's SVG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the embedded asset is missing or invalid.
    pub fn intrinsic_size(&self, id: StickerId) -> Result<Size> {
        let size = Self::tree(id)?.size();
        Ok(Size::new(size.width(), size.height()))
    }

    /// Rasterizes the sticker at its intrinsic size, reusing cached pixmaps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the asset cannot be parsed or drawn.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rasterize(&self, id: StickerId) -> Result<Arc<Pixmap>> {
        if let Some(hit) = self.lock().get(&id) {
            return Ok(Arc::clone(hit));
        }

        let tree = Self::tree(id)?;
        let size = tree.size();
        let mut pixmap = Pixmap::new(size.width().ceil() as u32, size.height().ceil() as u32)
            .ok_or_else(|| Error::Render(format!("sticker {id} has no area")))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        log::debug!("rasterized sticker {id} at {}x{}", pixmap.width(), pixmap.height());

        let pixmap = Arc::new(pixmap);
        self.lock().put(id, Arc::clone(&pixmap));
        Ok(pixmap)
    }

    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<StickerId, Arc<Pixmap>>> {
        // The cache holds no invariants a panicking writer could break.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sticker_is_embedded() {
        let catalog = StickerCatalog::new();
        for id in StickerId::ALL {
            let size = catalog.intrinsic_size(id).unwrap();
            assert_eq!((size.width, size.height), (120.0, 120.0), "{id}");
        }
    }

    #[test]
    fn names_round_trip() {
        for id in StickerId::ALL {
            assert_eq!(id.name().parse::<StickerId>().unwrap(), id);
        }
        assert_eq!(
            "unicorn".parse::<StickerId>(),
            Err(Error::Validation(ValidationError::UnknownSticker("unicorn".into())))
        );
    }

    #[test]
    fn rasterized_sticker_has_visible_pixels() {
        let catalog = StickerCatalog::new();
        let pixmap = catalog.rasterize(StickerId::Heart).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (120, 120));
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }

    #[test]
    fn cache_is_bounded() {
        let catalog = StickerCatalog::with_capacity(2);
        let first = catalog.rasterize(StickerId::Sun).unwrap();
        let again = catalog.rasterize(StickerId::Sun).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        catalog.rasterize(StickerId::Moon).unwrap();
        catalog.rasterize(StickerId::Star).unwrap();
        assert_eq!(catalog.cached_count(), 2);

        let evicted = catalog.rasterize(StickerId::Sun).unwrap();
        assert!(!Arc::ptr_eq(&first, &evicted));
    }
}
