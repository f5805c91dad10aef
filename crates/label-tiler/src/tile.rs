//! Cropping decoded images into labeled tiles and writing them to disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use label_tiler_core::{ImageSize, LabelBox, PlacedTile, Tiler, TilerParams};
use log::info;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::io::{load_labels, tile_output_paths, write_labels, OutputPaths};
use crate::TilerError;

/// One planned tile together with its cropped pixels.
#[derive(Clone, Debug)]
pub struct TileCrop {
    pub tile: PlacedTile,
    pub image: DynamicImage,
}

/// Pixel size of a decoded image.
pub fn image_size(img: &DynamicImage) -> ImageSize {
    ImageSize::new(img.width(), img.height())
}

/// Plan tiles for `boxes` on `img` and crop each of them.
pub fn tile_image(img: &DynamicImage, boxes: &[LabelBox], params: &TilerParams) -> Vec<TileCrop> {
    Tiler::new(*params)
        .plan(boxes, image_size(img))
        .into_iter()
        .map(|tile| {
            // Planned tiles always lie inside the image.
            let r = tile.rect;
            let image = img.crop_imm(r.x as u32, r.y as u32, r.width as u32, r.height as u32);
            TileCrop { tile, image }
        })
        .collect()
}

/// Outcome of tiling one image file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TileFileReport {
    pub source: PathBuf,
    pub outputs: Vec<OutputPaths>,
}

impl TileFileReport {
    pub fn tiles(&self) -> usize {
        self.outputs.len()
    }
}

/// Decode `image_path`, tile it with the boxes from `label_path` and write
/// every tile plus its label file into `out_dir`.
///
/// A missing label file means no boxes and therefore no tiles. Write errors
/// are returned as-is; tiles written before the failure stay on disk.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(params), fields(tile = %params.tile_size))
)]
pub fn tile_file(
    image_path: &Path,
    label_path: &Path,
    out_dir: &Path,
    params: &TilerParams,
) -> Result<TileFileReport, TilerError> {
    let img = image::open(image_path).map_err(|e| TilerError::image(image_path, e))?;
    let boxes = load_labels(label_path);

    let crops = tile_image(&img, &boxes, params);
    if !crops.is_empty() {
        fs::create_dir_all(out_dir).map_err(|e| TilerError::io(out_dir, e))?;
    }

    let mut report = TileFileReport {
        source: image_path.to_path_buf(),
        outputs: Vec::with_capacity(crops.len()),
    };
    for crop in &crops {
        let paths = tile_output_paths(image_path, out_dir, crop.tile.index)?;
        crop.image
            .save(&paths.image)
            .map_err(|e| TilerError::image(&paths.image, e))?;
        write_labels(&paths.labels, &crop.tile.boxes)?;
        report.outputs.push(paths);
    }

    info!(
        "generated {} tiles for {}",
        report.tiles(),
        image_path.display()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use label_tiler_core::TileSize;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 7])
        }))
    }

    #[test]
    fn crops_match_planned_rectangles() {
        let img = gradient(1000, 800);
        let params = TilerParams::new(TileSize::new(400, 400));
        let crops = tile_image(&img, &[LabelBox::new(0, 0.5, 0.5, 0.2, 0.2)], &params);
        assert_eq!(crops.len(), 1);

        let crop = &crops[0];
        assert_eq!(crop.image.dimensions(), (400, 400));
        // Tile origin is (300, 200); red wraps at 256.
        assert_eq!(crop.image.get_pixel(0, 0).0, [44, 200, 7, 255]);
        assert_eq!(crop.image.get_pixel(10, 20).0, [54, 220, 7, 255]);
    }

    #[test]
    fn oversized_tile_crops_nothing() {
        let img = gradient(100, 80);
        let params = TilerParams::new(TileSize::new(128, 64));
        assert!(tile_image(&img, &[LabelBox::new(0, 0.5, 0.5, 0.1, 0.1)], &params).is_empty());
    }
}
