//! Running one augmentation over many images in parallel.

use std::path::{Path, PathBuf};

use label_tiler_core::{Augmentation, DEFAULT_IOU_THRESHOLD};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::augment::augment_file_with;
use crate::dataset::{scan_dir, DatasetEntry};
use crate::io::{write_json, OutputPaths, TileRunConfig};
use crate::TilerError;

/// What to do with every image of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    pub augmentation: Augmentation,
    pub iou_threshold: f64,
    /// `None` writes next to each source image.
    pub output_dir: Option<PathBuf>,
}

impl BatchJob {
    pub fn new(augmentation: Augmentation) -> Self {
        Self {
            augmentation,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            output_dir: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f64) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    fn out_dir_for<'a>(&'a self, image_path: &'a Path) -> &'a Path {
        match &self.output_dir {
            Some(dir) => dir,
            None => image_path.parent().unwrap_or(Path::new(".")),
        }
    }
}

/// Result for one image of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    Written {
        source: PathBuf,
        outputs: Vec<OutputPaths>,
    },
    /// No label file, nothing to augment.
    Skipped { source: PathBuf },
    Failed { source: PathBuf, error: String },
}

impl ImageOutcome {
    pub fn source(&self) -> &Path {
        match self {
            ImageOutcome::Written { source, .. }
            | ImageOutcome::Skipped { source }
            | ImageOutcome::Failed { source, .. } => source,
        }
    }
}

/// Per-image outcomes of a batch, in input order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub augmentation: Augmentation,
    pub images: Vec<ImageOutcome>,
}

impl BatchReport {
    /// Image and label pairs written across the batch.
    pub fn outputs(&self) -> usize {
        self.images
            .iter()
            .map(|o| match o {
                ImageOutcome::Written { outputs, .. } => outputs.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn skipped(&self) -> usize {
        self.images
            .iter()
            .filter(|o| matches!(o, ImageOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.images
            .iter()
            .filter(|o| matches!(o, ImageOutcome::Failed { .. }))
            .count()
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TilerError> {
        write_json(self, path.as_ref())
    }
}

fn process_entry(entry: &DatasetEntry, job: &BatchJob) -> ImageOutcome {
    let source = entry.image_path.clone();
    if !entry.label_path.is_file() {
        warn!("{}: no label file, skipped", source.display());
        return ImageOutcome::Skipped { source };
    }

    let out_dir = job.out_dir_for(&entry.image_path);
    match augment_file_with(
        &entry.image_path,
        &entry.label_path,
        out_dir,
        job.augmentation,
        job.iou_threshold,
    ) {
        Ok(report) => ImageOutcome::Written {
            source,
            outputs: report.outputs,
        },
        Err(err) => {
            warn!("{}: {err}", source.display());
            ImageOutcome::Failed {
                source,
                error: err.to_string(),
            }
        }
    }
}

/// Augment every entry, one rayon task per image.
///
/// A failing image never aborts the batch; it is logged and recorded.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(entries, job),
        fields(images = entries.len(), method = %job.augmentation)
    )
)]
pub fn run_batch(entries: &[DatasetEntry], job: &BatchJob) -> BatchReport {
    let images: Vec<ImageOutcome> = entries
        .par_iter()
        .map(|entry| process_entry(entry, job))
        .collect();

    let report = BatchReport {
        augmentation: job.augmentation,
        images,
    };
    info!(
        "{}: {} images, {} outputs, {} skipped, {} failed",
        job.augmentation,
        report.images.len(),
        report.outputs(),
        report.skipped(),
        report.failed()
    );
    report
}

/// Scan, augment and optionally write the report, as described by `config`.
pub fn run_config(config: &TileRunConfig) -> Result<BatchReport, TilerError> {
    let entries = scan_dir(&config.input_dir, &config.filter)?;
    let mut job = BatchJob::new(config.augmentation).with_iou_threshold(config.iou_threshold);
    job.output_dir = config.output_dir.clone();

    let report = run_batch(&entries, &job);
    if let Some(path) = &config.report_path {
        report.write_json(path)?;
    }
    Ok(report)
}
