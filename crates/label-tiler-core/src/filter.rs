use log::debug;

use crate::{ImageSize, LabelBox, TileSize};

/// True when a tile of `tile` extent can be placed inside `image`.
#[inline]
pub fn tile_fits_image(image: ImageSize, tile: TileSize) -> bool {
    tile.is_positive() && tile.width <= image.width && tile.height <= image.height
}

/// Boxes that can be fully contained in one tile, in input order.
///
/// Returns nothing when the tile itself does not fit the image. Boxes wider
/// or taller than the tile are dropped rather than approximated.
pub fn feasible_boxes(boxes: &[LabelBox], image: ImageSize, tile: TileSize) -> Vec<LabelBox> {
    if !tile_fits_image(image, tile) {
        return Vec::new();
    }

    let (tw, th) = (i64::from(tile.width), i64::from(tile.height));
    boxes
        .iter()
        .filter(|b| {
            let (bw, bh) = b.pixel_size(image);
            let keep = bw <= tw && bh <= th;
            if !keep {
                debug!(
                    "box of class {} is {}x{} px, larger than tile {}",
                    b.class_id, bw, bh, tile
                );
            }
            keep
        })
        .copied()
        .collect()
}
