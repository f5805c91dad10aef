//! Tile placement, near-duplicate rejection and label re-projection.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::filter::{feasible_boxes, tile_fits_image};
use crate::grouping::{group_boxes, Group};
use crate::{ImageSize, LabelBox, PixelRect, TileSize, TilerParams};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One emitted tile: its pixel rectangle in the source image and the boxes
/// re-normalized to the tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile {
    /// 1-based index among the emitted tiles of one image; used for naming.
    pub index: usize,
    pub rect: PixelRect,
    pub boxes: Vec<LabelBox>,
}

/// Top-left corner of a `tile` centered on `union` and shifted back inside
/// `image`. The caller guarantees the tile fits the image.
pub fn centered_origin(union: &PixelRect, image: ImageSize, tile: TileSize) -> (i64, i64) {
    let (cx, cy) = union.center();
    (
        clamp_axis(cx - i64::from(tile.width) / 2, tile.width, image.width),
        clamp_axis(cy - i64::from(tile.height) / 2, tile.height, image.height),
    )
}

#[inline]
fn clamp_axis(origin: i64, tile: u32, image: u32) -> i64 {
    let mut o = origin.max(0);
    if o + i64::from(tile) > i64::from(image) {
        o = i64::from(image) - i64::from(tile);
    }
    o
}

/// Clip `b` to `tile` and express the visible part in tile-normalized
/// coordinates. `None` when nothing of the box lies inside the tile.
pub fn clip_to_tile(b: &LabelBox, image: ImageSize, tile: &PixelRect) -> Option<LabelBox> {
    let inter = b.pixel_rect(image).intersection(tile)?;
    let tw = tile.width as f64;
    let th = tile.height as f64;
    let x0 = (inter.x - tile.x) as f64;
    let y0 = (inter.y - tile.y) as f64;
    let w = inter.width as f64;
    let h = inter.height as f64;
    Some(LabelBox::new(
        b.class_id,
        ((x0 + w / 2.0) / tw) as f32,
        ((y0 + h / 2.0) / th) as f32,
        (w / tw) as f32,
        (h / th) as f32,
    ))
}

/// Place one tile per group, skipping near-duplicates and tiles that would
/// carry no label.
pub fn plan_tiles(groups: &[Group], image: ImageSize, params: &TilerParams) -> Vec<PlacedTile> {
    let tile = params.tile_size;
    if !tile_fits_image(image, tile) {
        return Vec::new();
    }

    let mut placed: Vec<PlacedTile> = Vec::new();
    for (gi, group) in groups.iter().enumerate() {
        let Some(union) = group.union(image) else {
            continue;
        };
        if !union.fits_within(tile) {
            debug!(
                "group {gi}: union {}x{} exceeds tile {tile}, skipped",
                union.width, union.height
            );
            continue;
        }

        let (x, y) = centered_origin(&union, image, tile);
        let rect = PixelRect::with_tile_size(x, y, tile);

        if let Some(prev) = placed
            .iter()
            .find(|p| p.rect.iou(&rect) > params.iou_threshold)
        {
            debug!(
                "group {gi}: tile at ({x}, {y}) overlaps tile #{} (iou {:.3}), skipped",
                prev.index,
                prev.rect.iou(&rect)
            );
            continue;
        }

        let boxes: Vec<LabelBox> = group
            .boxes()
            .iter()
            .filter_map(|b| clip_to_tile(b, image, &rect))
            .collect();
        if boxes.is_empty() {
            debug!("group {gi}: no box intersects tile at ({x}, {y}), skipped");
            continue;
        }

        placed.push(PlacedTile {
            index: placed.len() + 1,
            rect,
            boxes,
        });
    }
    placed
}

/// Full tiling pipeline for one image: feasibility filter, greedy grouping,
/// then placement.
#[derive(Clone, Debug)]
pub struct Tiler {
    params: TilerParams,
}

impl Tiler {
    pub fn new(params: TilerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TilerParams {
        &self.params
    }

    /// Plan every tile for `boxes` on an image of `image` size.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, boxes),
            fields(boxes = boxes.len(), width = image.width, height = image.height)
        )
    )]
    pub fn plan(&self, boxes: &[LabelBox], image: ImageSize) -> Vec<PlacedTile> {
        let tile = self.params.tile_size;
        if !tile_fits_image(image, tile) {
            info!(
                "tile {tile} does not fit image {}x{}, nothing to tile",
                image.width, image.height
            );
            return Vec::new();
        }

        let filtered = feasible_boxes(boxes, image, tile);
        if filtered.is_empty() {
            info!("no box fits tile {tile}, nothing to tile");
            return Vec::new();
        }

        let groups = group_boxes(&filtered, image, tile);
        let tiles = plan_tiles(&groups, image, &self.params);
        info!(
            "{} boxes -> {} usable -> {} groups -> {} tiles",
            boxes.len(),
            filtered.len(),
            groups.len(),
            tiles.len()
        );
        tiles
    }
}
