//! Scanning a folder of labeled images.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use label_tiler_core::{ImageSize, ObjectStats};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::io::{label_path_for, load_labels};
use crate::TilerError;

/// Image extensions picked up by [`scan_dir`], compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

static AUGMENTED_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(_FH|_FV|_R90|_R-90|\[\d+\])$").expect("augmented stem pattern")
});

/// True when `stem` carries a suffix written by an augmentation,
/// e.g. `img_FH` or `img[3]`.
pub fn is_augmented_stem(stem: &str) -> bool {
    AUGMENTED_STEM.is_match(stem)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFilter {
    #[default]
    All,
    /// Label file present with some content.
    Labelled,
    Unlabelled,
}

/// Which images of a folder to keep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanFilter {
    /// Case-insensitive file name substring.
    pub name_contains: Option<String>,
    pub labels: LabelFilter,
    /// Hide outputs of earlier augmentations.
    pub originals_only: bool,
}

impl ScanFilter {
    fn accepts(&self, file_name: &str, stem: &str, has_labels: bool) -> bool {
        if let Some(needle) = &self.name_contains {
            if !file_name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if self.originals_only && is_augmented_stem(stem) {
            return false;
        }
        match self.labels {
            LabelFilter::All => true,
            LabelFilter::Labelled => has_labels,
            LabelFilter::Unlabelled => !has_labels,
        }
    }
}

/// One image of a dataset folder and its label file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub image_path: PathBuf,
    /// `<stem>.txt` next to the image; may not exist.
    pub label_path: PathBuf,
    pub has_labels: bool,
}

impl DatasetEntry {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        let image_path = image_path.into();
        let label_path = label_path_for(&image_path);
        let has_labels = has_label_content(&label_path);
        Self {
            image_path,
            label_path,
            has_labels,
        }
    }

    pub fn file_name(&self) -> String {
        self.image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Largest and smallest object, in pixels of the source image.
    ///
    /// Only the image header is decoded.
    pub fn stats(&self) -> Result<ObjectStats, TilerError> {
        let (width, height) = image::image_dimensions(&self.image_path)
            .map_err(|e| TilerError::image(&self.image_path, e))?;
        let boxes = if self.has_labels {
            load_labels(&self.label_path)
        } else {
            Vec::new()
        };
        Ok(ObjectStats::from_boxes(&boxes, ImageSize::new(width, height)))
    }
}

/// Remove the image of `entry` and its label file, if there is one.
pub fn delete_entry(entry: &DatasetEntry) -> Result<(), TilerError> {
    fs::remove_file(&entry.image_path).map_err(|e| TilerError::io(&entry.image_path, e))?;
    match fs::remove_file(&entry.label_path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(TilerError::io(&entry.label_path, e)),
    }
    info!("deleted {}", entry.image_path.display());
    Ok(())
}

fn has_label_content(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// List the images of `dir` (not recursive) that pass `filter`, sorted by
/// file name.
pub fn scan_dir(dir: &Path, filter: &ScanFilter) -> Result<Vec<DatasetEntry>, TilerError> {
    if !dir.is_dir() {
        return Err(TilerError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for item in fs::read_dir(dir).map_err(|e| TilerError::io(dir, e))? {
        let path = item.map_err(|e| TilerError::io(dir, e))?.path();
        if !path.is_file() || !is_image_file(&path) {
            continue;
        }
        let entry = DatasetEntry::new(path);
        let stem = entry
            .image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if filter.accepts(&entry.file_name(), &stem, entry.has_labels) {
            entries.push(entry);
        }
    }
    entries.sort_by(|a, b| a.image_path.file_name().cmp(&b.image_path.file_name()));

    debug!("{} images selected in {}", entries.len(), dir.display());
    Ok(entries)
}
