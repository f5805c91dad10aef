//! First-fit grouping of boxes that can share a tile.
//!
//! Each box joins the earliest group whose pixel union, with the box added,
//! still fits inside one tile; otherwise it opens a new group. The result is
//! deterministic for a given input order and deliberately not an optimal
//! packing.

use crate::{ImageSize, LabelBox, PixelRect, TileSize};

/// Boxes that are tiled together, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    boxes: Vec<LabelBox>,
}

impl Group {
    fn single(b: LabelBox) -> Self {
        Self { boxes: vec![b] }
    }

    pub fn boxes(&self) -> &[LabelBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Smallest pixel rectangle covering every box of the group.
    pub fn union(&self, image: ImageSize) -> Option<PixelRect> {
        PixelRect::bounding(self.boxes.iter().map(|b| b.pixel_rect(image)))
    }
}

/// Partition `boxes` into groups whose union fits `tile`.
pub fn group_boxes(boxes: &[LabelBox], image: ImageSize, tile: TileSize) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for b in boxes {
        let rect = b.pixel_rect(image);
        let target = groups.iter_mut().find(|g| {
            g.union(image)
                .is_some_and(|u| u.union(&rect).fits_within(tile))
        });
        match target {
            Some(g) => g.boxes.push(*b),
            None => groups.push(Group::single(*b)),
        }
    }

    groups
}
