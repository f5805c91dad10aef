use std::error::Error;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use label_tiler::batch::{run_batch, run_config, BatchJob, BatchReport};
use label_tiler::core::{Augmentation, TileSize, TilerParams, Transform, DEFAULT_IOU_THRESHOLD};
use label_tiler::dataset::{delete_entry, scan_dir, LabelFilter, ScanFilter};
use label_tiler::io::{label_path_for, TileRunConfig};
use label_tiler::tile::tile_file;
use label_tiler::TilerError;
use log::warn;

#[derive(Parser, Debug)]
#[command(name = "label-tiler")]
#[command(version, about = "Tile and augment YOLO-labeled images")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON log lines (filter with RUST_LOG).
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tile a single labeled image.
    Tile(TileArgs),
    /// Apply one augmentation to every image of a folder.
    Augment(AugmentArgs),
    /// List the images of a folder with their largest and smallest object.
    List(ListArgs),
    /// Run a batch described by a JSON config.
    Run(RunArgs),
    /// Delete the selected images together with their label files.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct TileArgs {
    image: PathBuf,
    /// Label file; defaults to the image path with a `.txt` extension.
    #[arg(long)]
    labels: Option<PathBuf>,
    /// Tile size as `<width>x<height>`.
    #[arg(long)]
    size: TileSize,
    #[arg(long, default_value_t = DEFAULT_IOU_THRESHOLD)]
    iou: f64,
    /// Output directory; defaults to the image's directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    Tile,
    Rotate90,
    RotateNeg90,
    FlipHorizontal,
    FlipVertical,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Keep file names containing this text (case-insensitive).
    #[arg(long)]
    filter: Option<String>,
    /// Keep images with a non-empty label file.
    #[arg(long, conflicts_with = "unlabelled")]
    labelled: bool,
    /// Keep images without labels.
    #[arg(long)]
    unlabelled: bool,
    /// Hide outputs of earlier augmentations.
    #[arg(long)]
    originals_only: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> ScanFilter {
        let labels = if self.labelled {
            LabelFilter::Labelled
        } else if self.unlabelled {
            LabelFilter::Unlabelled
        } else {
            LabelFilter::All
        };
        ScanFilter {
            name_contains: self.filter.clone(),
            labels,
            originals_only: self.originals_only,
        }
    }
}

#[derive(Args, Debug)]
struct AugmentArgs {
    dir: PathBuf,
    #[arg(long, value_enum)]
    method: Method,
    /// Tile size as `<width>x<height>`, required by `--method tile`.
    #[arg(long)]
    size: Option<TileSize>,
    #[arg(long, default_value_t = DEFAULT_IOU_THRESHOLD)]
    iou: f64,
    /// Output directory; defaults to each image's directory.
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    filter: FilterArgs,
    /// Write a JSON report of the batch here.
    #[arg(long)]
    report: Option<PathBuf>,
}

impl AugmentArgs {
    fn augmentation(&self) -> Result<Augmentation, TilerError> {
        let transform = match self.method {
            Method::Tile => {
                return self
                    .size
                    .map(Augmentation::Tile)
                    .ok_or(TilerError::MissingTileSize)
            }
            Method::Rotate90 => Transform::Rotate90,
            Method::RotateNeg90 => Transform::RotateNeg90,
            Method::FlipHorizontal => Transform::FlipHorizontal,
            Method::FlipVertical => Transform::FlipVertical,
        };
        Ok(Augmentation::Transform(transform))
    }
}

#[derive(Args, Debug)]
struct ListArgs {
    dir: PathBuf,
    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    dir: PathBuf,
    #[command(flatten)]
    filter: FilterArgs,
    /// Only print what would be deleted.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.cmd {
        Command::Tile(args) => run_tile(args),
        Command::Augment(args) => run_augment(args),
        Command::List(args) => run_list(args),
        Command::Run(args) => run_from_config(args),
        Command::Delete(args) => run_delete(args),
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    label_tiler::core::init_tracing(cli.log_json);
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    label_tiler::core::init_with_level(label_tiler::core::level_from_verbosity(cli.verbose))?;
    Ok(())
}

fn run_tile(args: TileArgs) -> Result<(), Box<dyn Error>> {
    let labels = args
        .labels
        .clone()
        .unwrap_or_else(|| label_path_for(&args.image));
    let out = match &args.out {
        Some(dir) => dir.clone(),
        None => args
            .image
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let params = TilerParams::new(args.size).with_iou_threshold(args.iou);

    let report = tile_file(&args.image, &labels, &out, &params)?;
    for paths in &report.outputs {
        println!("{}", paths.image.display());
    }
    println!("{} tiles written", report.tiles());
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!(
        "{}: {} images, {} outputs, {} skipped, {} failed",
        report.augmentation,
        report.images.len(),
        report.outputs(),
        report.skipped(),
        report.failed()
    );
}

fn run_augment(args: AugmentArgs) -> Result<(), Box<dyn Error>> {
    let augmentation = args.augmentation()?;
    let entries = scan_dir(&args.dir, &args.filter.to_filter())?;

    let mut job = BatchJob::new(augmentation).with_iou_threshold(args.iou);
    job.output_dir = args.out.clone();
    let report = run_batch(&entries, &job);
    if let Some(path) = &args.report {
        report.write_json(path)?;
    }
    print_summary(&report);
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), Box<dyn Error>> {
    for entry in scan_dir(&args.dir, &args.filter.to_filter())? {
        match entry.stats() {
            Ok(stats) => println!(
                "{}\tobjects: {}\tlargest: {}\tsmallest: {}",
                entry.file_name(),
                stats.count,
                stats.largest,
                stats.smallest
            ),
            Err(err) => warn!("{err}"),
        }
    }
    Ok(())
}

fn run_from_config(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let config = TileRunConfig::load_json(&args.config)?;
    let report = run_config(&config)?;
    print_summary(&report);
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<(), Box<dyn Error>> {
    let entries = scan_dir(&args.dir, &args.filter.to_filter())?;
    for entry in &entries {
        if !args.dry_run {
            delete_entry(entry)?;
        }
        println!("{}", entry.image_path.display());
    }
    let verb = if args.dry_run { "would delete" } else { "deleted" };
    println!("{verb} {} images", entries.len());
    Ok(())
}
