//! Normalized label boxes and the integer pixel rectangles derived from them.

use serde::{Deserialize, Serialize};

use crate::TileSize;

/// Pixel dimensions of a decoded source raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One YOLO-style annotation: class id plus a center/size box normalized to
/// the width and height of the image (or tile) it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    pub class_id: i32,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl LabelBox {
    pub const fn new(class_id: i32, center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            class_id,
            center_x,
            center_y,
            width,
            height,
        }
    }

    /// Size invariant every loaded box must satisfy: `0 < w <= 1`, `0 < h <= 1`.
    ///
    /// NaN sizes fail every comparison and are rejected as well.
    #[inline]
    pub fn has_valid_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width <= 1.0 && self.height <= 1.0
    }

    /// Rounded pixel extent `(width, height)` of this box inside `image`.
    #[inline]
    pub fn pixel_size(&self, image: ImageSize) -> (i64, i64) {
        (
            to_pixels(self.width, image.width),
            to_pixels(self.height, image.height),
        )
    }

    /// Absolute pixel rectangle of this box inside `image`.
    pub fn pixel_rect(&self, image: ImageSize) -> PixelRect {
        let cx = to_pixels(self.center_x, image.width);
        let cy = to_pixels(self.center_y, image.height);
        let (w, h) = self.pixel_size(image);
        PixelRect::new(cx - w / 2, cy - h / 2, w, h)
    }
}

/// Far-off coordinates are clamped to `±4 * dim` so later integer sums
/// cannot overflow.
#[inline]
fn to_pixels(norm: f32, dim: u32) -> i64 {
    let limit = 4.0 * f64::from(dim);
    (f64::from(norm) * f64::from(dim)).round().clamp(-limit, limit) as i64
}

/// Integer axis-aligned rectangle in absolute pixel coordinates.
///
/// Coordinates may be negative: a box hanging over the image border keeps its
/// true extent until it is intersected with a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `tile` extent with its top-left corner at `(x, y)`.
    pub fn with_tile_size(x: i64, y: i64, tile: TileSize) -> Self {
        Self::new(x, y, i64::from(tile.width), i64::from(tile.height))
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Integer center, truncated toward the top-left.
    #[inline]
    pub fn center(&self) -> (i64, i64) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width.max(0) * self.height.max(0)
    }

    #[inline]
    pub fn fits_within(&self, tile: TileSize) -> bool {
        self.width <= i64::from(tile.width) && self.height <= i64::from(tile.height)
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        PixelRect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Overlap of two rectangles, `None` unless it has positive width and height.
    pub fn intersection(&self, other: &PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 < x1 && y0 < y1 {
            Some(PixelRect::new(x0, y0, x1 - x0, y1 - y0))
        } else {
            None
        }
    }

    /// Intersection over union; `0.0` for disjoint or degenerate rectangles.
    pub fn iou(&self, other: &PixelRect) -> f64 {
        let inter = self.intersection(other).map_or(0, |r| r.area());
        let union = self.area() + other.area() - inter;
        if union <= 0 {
            return 0.0;
        }
        inter as f64 / union as f64
    }

    /// Covering rectangle of every item, `None` for an empty iterator.
    pub fn bounding<I>(rects: I) -> Option<PixelRect>
    where
        I: IntoIterator<Item = PixelRect>,
    {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }
}
