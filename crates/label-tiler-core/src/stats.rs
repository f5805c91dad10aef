use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ImageSize, LabelBox};

/// Truncated pixel extent of one object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelExtent {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for PixelExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Largest and smallest object of one image, by pixel area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStats {
    pub count: usize,
    pub largest: PixelExtent,
    pub smallest: PixelExtent,
}

impl ObjectStats {
    /// Stats for `boxes` on an image of `image` size; all zero when empty.
    ///
    /// Ties keep the first box for `smallest` and the last one for `largest`.
    pub fn from_boxes(boxes: &[LabelBox], image: ImageSize) -> Self {
        let area = |b: &&LabelBox| {
            f64::from(b.width) * f64::from(image.width) * f64::from(b.height) * f64::from(image.height)
        };
        let extent = |b: &LabelBox| PixelExtent {
            width: (f64::from(b.width) * f64::from(image.width)) as u32,
            height: (f64::from(b.height) * f64::from(image.height)) as u32,
        };

        let largest = boxes.iter().max_by(|a, b| area(a).total_cmp(&area(b)));
        let smallest = boxes.iter().min_by(|a, b| area(a).total_cmp(&area(b)));
        match (largest, smallest) {
            (Some(l), Some(s)) => Self {
                count: boxes.len(),
                largest: extent(l),
                smallest: extent(s),
            },
            _ => Self::default(),
        }
    }
}
