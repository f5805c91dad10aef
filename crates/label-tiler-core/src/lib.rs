//! Geometry core for tiling labeled images.
//!
//! Given the pixel size of an image, its normalized YOLO-style boxes and a
//! tile size, the [`Tiler`] plans fixed-size crops so that every box that can
//! fit a tile ends up whole in one of them:
//!
//! 1. [`feasible_boxes`] drops boxes larger than the tile (and everything when
//!    the tile exceeds the image),
//! 2. [`group_boxes`] clusters boxes first-fit while their union fits a tile,
//! 3. [`plan_tiles`] centers a tile on each group, clamps it into the image,
//!    rejects near-duplicates by IoU and re-projects the boxes.
//!
//! This crate does no image decoding or file I/O; see the `label-tiler`
//! crate for that.
//!
//! ```
//! use label_tiler_core::{ImageSize, LabelBox, TileSize, Tiler, TilerParams};
//!
//! let tiler = Tiler::new(TilerParams::new(TileSize::new(400, 400)));
//! let boxes = [LabelBox::new(0, 0.5, 0.5, 0.2, 0.2)];
//! let tiles = tiler.plan(&boxes, ImageSize::new(1000, 800));
//! assert_eq!(tiles.len(), 1);
//! assert_eq!((tiles[0].rect.x, tiles[0].rect.y), (300, 200));
//! ```

mod augment;
mod filter;
mod geometry;
mod grouping;
pub mod label;
mod logger;
mod params;
mod placement;
mod stats;
mod tile_size;

pub use augment::{Augmentation, Transform};
pub use filter::{feasible_boxes, tile_fits_image};
pub use geometry::{ImageSize, LabelBox, PixelRect};
pub use grouping::{group_boxes, Group};
pub use params::{TilerParams, DEFAULT_IOU_THRESHOLD};
pub use placement::{centered_origin, clip_to_tile, plan_tiles, PlacedTile, Tiler};
pub use stats::{ObjectStats, PixelExtent};
pub use tile_size::{TileSize, TileSizeParseError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
