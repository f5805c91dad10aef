//! Augmentation methods and the label transforms of the geometric ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ImageSize, LabelBox, TileSize};

/// Whole-image rotation or mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Quarter turn clockwise.
    Rotate90,
    /// Quarter turn counter-clockwise.
    RotateNeg90,
    /// Mirror left/right.
    FlipHorizontal,
    /// Mirror top/bottom.
    FlipVertical,
}

impl Transform {
    pub const ALL: [Transform; 4] = [
        Transform::Rotate90,
        Transform::RotateNeg90,
        Transform::FlipHorizontal,
        Transform::FlipVertical,
    ];

    /// File-stem suffix marking outputs of this transform.
    pub fn suffix(self) -> &'static str {
        match self {
            Transform::Rotate90 => "_R90",
            Transform::RotateNeg90 => "_R-90",
            Transform::FlipHorizontal => "_FH",
            Transform::FlipVertical => "_FV",
        }
    }

    /// Size of the transformed image.
    pub fn output_size(self, image: ImageSize) -> ImageSize {
        match self {
            Transform::Rotate90 | Transform::RotateNeg90 => {
                ImageSize::new(image.height, image.width)
            }
            Transform::FlipHorizontal | Transform::FlipVertical => image,
        }
    }

    /// Map a normalized box into the transformed image.
    pub fn apply(self, b: &LabelBox) -> LabelBox {
        let LabelBox {
            class_id,
            center_x: cx,
            center_y: cy,
            width: w,
            height: h,
        } = *b;
        match self {
            Transform::Rotate90 => LabelBox::new(class_id, 1.0 - cy, cx, h, w),
            Transform::RotateNeg90 => LabelBox::new(class_id, cy, 1.0 - cx, h, w),
            Transform::FlipHorizontal => LabelBox::new(class_id, 1.0 - cx, cy, w, h),
            Transform::FlipVertical => LabelBox::new(class_id, cx, 1.0 - cy, w, h),
        }
    }

    pub fn apply_all(self, boxes: &[LabelBox]) -> Vec<LabelBox> {
        boxes.iter().map(|b| self.apply(b)).collect()
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transform::Rotate90 => "rotate 90",
            Transform::RotateNeg90 => "rotate -90",
            Transform::FlipHorizontal => "flip horizontal",
            Transform::FlipVertical => "flip vertical",
        };
        f.write_str(name)
    }
}

/// One augmentation method applied to a labeled image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Augmentation {
    /// Fixed-size crops around groups of annotations.
    Tile(TileSize),
    Transform(Transform),
}

impl fmt::Display for Augmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Augmentation::Tile(size) => write!(f, "tile {size}"),
            Augmentation::Transform(t) => fmt::Display::fmt(t, f),
        }
    }
}
