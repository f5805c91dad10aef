//! Label files, output naming and JSON configuration.

use std::fs;
use std::path::{Path, PathBuf};

use label_tiler_core::label::{format_labels, parse_labels};
use label_tiler_core::{Augmentation, LabelBox, Transform, DEFAULT_IOU_THRESHOLD};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dataset::ScanFilter;
use crate::TilerError;

/// Label file that belongs to `image_path`: same directory and stem, `.txt`.
pub fn label_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Read a label file, best effort: a missing or unreadable file yields no
/// boxes and a warning, malformed lines are skipped.
pub fn load_labels(path: &Path) -> Vec<LabelBox> {
    match fs::read_to_string(path) {
        Ok(text) => parse_labels(&text),
        Err(err) => {
            warn!("cannot read label file {}: {err}", path.display());
            Vec::new()
        }
    }
}

pub fn write_labels(path: &Path, boxes: &[LabelBox]) -> Result<(), TilerError> {
    fs::write(path, format_labels(boxes)).map_err(|e| TilerError::io(path, e))
}

/// Image and label paths written for one output derived from `source`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub image: PathBuf,
    pub labels: PathBuf,
}

fn derived_paths(
    source: &Path,
    out_dir: &Path,
    stem_suffix: &str,
) -> Result<OutputPaths, TilerError> {
    let stem = source
        .file_stem()
        .ok_or_else(|| TilerError::NoFileStem(source.to_path_buf()))?
        .to_string_lossy();
    let name = format!("{stem}{stem_suffix}");
    let image = match source.extension() {
        Some(ext) => out_dir.join(format!("{name}.{}", ext.to_string_lossy())),
        None => out_dir.join(&name),
    };
    let labels = out_dir.join(format!("{name}.txt"));
    Ok(OutputPaths { image, labels })
}

/// `<out_dir>/<stem>[<index>].<ext>` plus the matching `.txt`.
pub fn tile_output_paths(
    source: &Path,
    out_dir: &Path,
    index: usize,
) -> Result<OutputPaths, TilerError> {
    derived_paths(source, out_dir, &format!("[{index}]"))
}

/// `<out_dir>/<stem><suffix>.<ext>` plus the matching `.txt`, e.g. `img_FH.png`.
pub fn transform_output_paths(
    source: &Path,
    out_dir: &Path,
    transform: Transform,
) -> Result<OutputPaths, TilerError> {
    derived_paths(source, out_dir, transform.suffix())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TilerError> {
    let raw = fs::read_to_string(path).map_err(|e| TilerError::io(path, e))?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), TilerError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| TilerError::io(path, e))
}

fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

/// Batch augmentation settings, loaded from JSON.
///
/// ```json
/// {
///   "input_dir": "dataset/train",
///   "augmentation": { "tile": { "width": 640, "height": 640 } },
///   "filter": { "labels": "labelled", "originals_only": true }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileRunConfig {
    pub input_dir: PathBuf,
    /// Defaults to each image's own directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub augmentation: Augmentation,
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,
    #[serde(default)]
    pub filter: ScanFilter,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl TileRunConfig {
    pub fn new(input_dir: impl Into<PathBuf>, augmentation: Augmentation) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            augmentation,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            filter: ScanFilter::default(),
            report_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TilerError> {
        read_json(path.as_ref())
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TilerError> {
        write_json(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_tiler_core::TileSize;

    #[test]
    fn tile_names_use_bracketed_index() {
        let p = tile_output_paths(Path::new("/data/cat.v2.jpg"), Path::new("/out"), 3)
            .expect("paths");
        assert_eq!(p.image, PathBuf::from("/out/cat.v2[3].jpg"));
        assert_eq!(p.labels, PathBuf::from("/out/cat.v2[3].txt"));
    }

    #[test]
    fn transform_names_use_suffix() {
        let p = transform_output_paths(
            Path::new("a/img.png"),
            Path::new("a"),
            Transform::RotateNeg90,
        )
        .expect("paths");
        assert_eq!(p.image, PathBuf::from("a/img_R-90.png"));
        assert_eq!(p.labels, PathBuf::from("a/img_R-90.txt"));
    }

    #[test]
    fn label_path_replaces_extension() {
        assert_eq!(
            label_path_for(Path::new("dir/photo.JPG")),
            PathBuf::from("dir/photo.txt")
        );
    }

    #[test]
    fn missing_label_file_loads_as_empty() {
        assert!(load_labels(Path::new("/definitely/not/here.txt")).is_empty());
    }

    #[test]
    fn config_defaults_apply() {
        let cfg: TileRunConfig = serde_json::from_str(
            r#"{"input_dir": "imgs", "augmentation": {"tile": {"width": 320, "height": 320}}}"#,
        )
        .expect("parse config");
        assert_eq!(cfg.augmentation, Augmentation::Tile(TileSize::new(320, 320)));
        assert_eq!(cfg.iou_threshold, DEFAULT_IOU_THRESHOLD);
        assert!(cfg.output_dir.is_none());
        assert!(!cfg.filter.originals_only);
    }

    #[test]
    fn config_survives_disk() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("run.json");
        let mut cfg = TileRunConfig::new("imgs", Augmentation::Transform(Transform::FlipVertical));
        cfg.iou_threshold = 0.5;
        cfg.filter.name_contains = Some("cam".into());
        cfg.write_json(&path).expect("write config");

        let back = TileRunConfig::load_json(&path).expect("load config");
        assert_eq!(back.input_dir, PathBuf::from("imgs"));
        assert_eq!(back.augmentation, cfg.augmentation);
        assert_eq!(back.iou_threshold, 0.5);
        assert_eq!(back.filter, cfg.filter);
    }

    #[test]
    fn written_labels_reload() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("a.txt");
        write_labels(&path, &[LabelBox::new(4, 0.5, 0.25, 0.125, 0.75)]).expect("write");
        let boxes = load_labels(&path);
        assert_eq!(boxes, vec![LabelBox::new(4, 0.5, 0.25, 0.125, 0.75)]);
    }
}
