//! Tile and augment YOLO-labeled image datasets.
//!
//! This crate wraps the pure geometry of [`label_tiler_core`] with image
//! decoding, label file I/O and batch processing:
//! - [`tile`]: crop fixed-size tiles that keep every fitting box whole,
//! - [`augment`]: tiling or a rotation/mirror applied to one labeled image,
//! - [`dataset`]: list and filter the images of a folder,
//! - [`batch`]: run one augmentation over a folder in parallel,
//! - [`io`]: label files, output naming and the JSON run config.
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::path::Path;
//! use label_tiler::core::{TileSize, TilerParams};
//! use label_tiler::tile::tile_file;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = TilerParams::new(TileSize::new(640, 640));
//! let report = tile_file(
//!     Path::new("data/street.jpg"),
//!     Path::new("data/street.txt"),
//!     Path::new("tiles"),
//!     &params,
//! )?;
//! println!("{} tiles written", report.tiles());
//! # Ok(())
//! # }
//! ```
//!
//! ## Output naming
//! - tiles: `<stem>[<index>].<ext>` plus `<stem>[<index>].txt`, index from 1,
//! - transforms: `<stem>_R90`, `<stem>_R-90`, `<stem>_FH`, `<stem>_FV`.

pub use label_tiler_core as core;

pub mod augment;
pub mod batch;
pub mod dataset;
mod error;
pub mod io;
pub mod tile;

pub use error::TilerError;
