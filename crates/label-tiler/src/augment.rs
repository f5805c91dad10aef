//! Applying one augmentation method to a labeled image on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use label_tiler_core::{Augmentation, TilerParams, Transform, DEFAULT_IOU_THRESHOLD};
use log::info;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::io::{load_labels, transform_output_paths, write_labels, OutputPaths};
use crate::tile::tile_file;
use crate::TilerError;

/// Rotate or mirror a decoded image.
pub fn apply_transform(img: &DynamicImage, transform: Transform) -> DynamicImage {
    match transform {
        Transform::Rotate90 => img.rotate90(),
        Transform::RotateNeg90 => img.rotate270(),
        Transform::FlipHorizontal => img.fliph(),
        Transform::FlipVertical => img.flipv(),
    }
}

/// Files written for one source image.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AugmentReport {
    pub source: PathBuf,
    pub augmentation: Augmentation,
    pub outputs: Vec<OutputPaths>,
}

/// Augment `image_path` (labels from `label_path`) with the default IoU
/// threshold for tiling. See [`augment_file_with`].
pub fn augment_file(
    image_path: &Path,
    label_path: &Path,
    out_dir: &Path,
    augmentation: Augmentation,
) -> Result<AugmentReport, TilerError> {
    augment_file_with(
        image_path,
        label_path,
        out_dir,
        augmentation,
        DEFAULT_IOU_THRESHOLD,
    )
}

/// Augment one image and write the results into `out_dir`.
///
/// Tiling may write any number of tiles (zero included); a transform always
/// writes exactly one image and one label file.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", fields(method = %augmentation))
)]
pub fn augment_file_with(
    image_path: &Path,
    label_path: &Path,
    out_dir: &Path,
    augmentation: Augmentation,
    iou_threshold: f64,
) -> Result<AugmentReport, TilerError> {
    let outputs = match augmentation {
        Augmentation::Tile(size) => {
            let params = TilerParams::new(size).with_iou_threshold(iou_threshold);
            tile_file(image_path, label_path, out_dir, &params)?.outputs
        }
        Augmentation::Transform(transform) => {
            vec![transform_file(image_path, label_path, out_dir, transform)?]
        }
    };
    Ok(AugmentReport {
        source: image_path.to_path_buf(),
        augmentation,
        outputs,
    })
}

fn transform_file(
    image_path: &Path,
    label_path: &Path,
    out_dir: &Path,
    transform: Transform,
) -> Result<OutputPaths, TilerError> {
    let img = image::open(image_path).map_err(|e| TilerError::image(image_path, e))?;
    let boxes = transform.apply_all(&load_labels(label_path));
    let out = apply_transform(&img, transform);

    let paths = transform_output_paths(image_path, out_dir, transform)?;
    fs::create_dir_all(out_dir).map_err(|e| TilerError::io(out_dir, e))?;
    out.save(&paths.image)
        .map_err(|e| TilerError::image(&paths.image, e))?;
    write_labels(&paths.labels, &boxes)?;

    info!(
        "{transform}: {} -> {}",
        image_path.display(),
        paths.image.display()
    );
    Ok(paths)
}
