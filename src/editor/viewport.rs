// SPDX-License-Identifier: MPL-2.0
//! Mapping between the on-screen view and the working raster.
//!
//! The raster is shown scaled to fit inside the view and centered, so the
//! mapping is a uniform scale plus an offset.

use crate::domain::geometry::{Point, Rect, Size};
use crate::overlay::map_point;
use tiny_skia::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    view: Size,
    image: Size,
}

impl Viewport {
    #[must_use]
    pub fn new(view: Size, image: Size) -> Self {
        Self { view, image }
    }

    /// View of exactly the image's size: view and raster coordinates coincide.
    #[must_use]
    pub fn fit(image: Size) -> Self {
        Self::new(image, image)
    }

    /// Same view, different raster (after a crop or rotation).
    #[must_use]
    pub fn with_image(self, image: Size) -> Self {
        Self { image, ..self }
    }

    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view
    }

    #[must_use]
    pub fn image_size(&self) -> Size {
        self.image
    }

    /// View pixels per raster pixel.
    #[must_use]
    pub fn scale(&self) -> f32 {
        if self.image.is_empty() || self.view.is_empty() {
            return 1.0;
        }
        (self.view.width / self.image.width).min(self.view.height / self.image.height)
    }

    /// Where the raster is drawn inside the view.
    #[must_use]
    pub fn image_rect(&self) -> Rect {
        Rect::centered_in(self.view, self.image.scaled(self.scale()))
    }

    #[must_use]
    pub fn raster_to_view(&self) -> Transform {
        let shown = self.image_rect();
        let scale = self.scale();
        Transform::from_scale(scale, scale).post_translate(shown.x, shown.y)
    }

    #[must_use]
    pub fn view_to_raster(&self) -> Transform {
        let shown = self.image_rect();
        let inverse = 1.0 / self.scale();
        Transform::from_translate(-shown.x, -shown.y).post_scale(inverse, inverse)
    }

    #[must_use]
    pub fn view_point_to_raster(&self, point: Point) -> Point {
        map_point(&self.view_to_raster(), point)
    }

    #[must_use]
    pub fn view_rect_to_raster(&self, rect: Rect) -> Rect {
        let transform = self.view_to_raster();
        let top_left = map_point(&transform, Point::new(rect.x, rect.y));
        let bottom_right = map_point(&transform, Point::new(rect.right(), rect.bottom()));
        Rect::from_ltrb(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_viewport_is_identity() {
        let viewport = Viewport::fit(Size::new(300.0, 200.0));
        assert_eq!(viewport.scale(), 1.0);
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(viewport.view_rect_to_raster(rect), rect);
    }

    #[test]
    fn letterboxed_image_maps_back_to_raster() {
        // 2000x1000 raster shown in a 500x500 view: scale 0.25, bars of 125.
        let viewport = Viewport::new(Size::new(500.0, 500.0), Size::new(2000.0, 1000.0));
        assert_eq!(viewport.scale(), 0.25);
        assert_eq!(viewport.image_rect(), Rect::new(0.0, 125.0, 500.0, 250.0));

        let raster = viewport.view_rect_to_raster(Rect::new(0.0, 125.0, 500.0, 250.0));
        assert_eq!(raster, Rect::new(0.0, 0.0, 2000.0, 1000.0));
        assert_eq!(
            viewport.view_point_to_raster(Point::new(250.0, 250.0)),
            Point::new(1000.0, 500.0)
        );
    }

    #[test]
    fn raster_to_view_inverts_view_to_raster() {
        let viewport = Viewport::new(Size::new(400.0, 300.0), Size::new(800.0, 800.0));
        let round_trip = viewport.raster_to_view().post_concat(viewport.view_to_raster());
        let p = map_point(&round_trip, Point::new(123.0, 45.0));
        assert!((p.x - 123.0).abs() < 1e-3 && (p.y - 45.0).abs() < 1e-3);
    }
}
