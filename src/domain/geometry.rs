// SPDX-License-Identifier: MPL-2.0
//! Geometry primitives shared by view space and raster space.
//!
//! All values are `f32` because gesture input and layer transforms are
//! continuous; raster crops convert to integer pixels at the last moment.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Builds a size from integer pixel dimensions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Returns whether either side is zero or negative.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns `width / height`, or `None` for an empty size.
    #[must_use]
    pub fn aspect_ratio(self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.width / self.height)
        }
    }

    /// Returns this size multiplied uniformly by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// An axis-aligned rectangle stored as origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rectangle from its left/top/right/bottom edges.
    #[must_use]
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Builds the smallest rectangle containing all `points`.
    ///
    /// Returns `None` when `points` is empty.
    #[must_use]
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut left, mut top, mut right, mut bottom) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }
        Some(Self::from_ltrb(left, top, right, bottom))
    }

    /// Builds a rectangle of `size` centered inside `outer`.
    #[must_use]
    pub fn centered_in(outer: Size, size: Size) -> Self {
        Self::new(
            (outer.width - size.width) / 2.0,
            (outer.height - size.height) / 2.0,
            size.width,
            size.height,
        )
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns whether the rectangle has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Returns whether the two rectangles share any area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns the overlapping area of both rectangles, if any.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect::from_ltrb(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Returns the four corners clockwise from the top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// Returns this rectangle translated by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}
