use std::fs;
use std::path::Path;

use image::RgbImage;
use label_tiler::dataset::{scan_dir, DatasetEntry, LabelFilter, ScanFilter};

fn names(entries: &[DatasetEntry]) -> Vec<String> {
    entries.iter().map(DatasetEntry::file_name).collect()
}

/// `a.png` labelled, `a_FH.png` labelled, `b.JPG` with a blank label file,
/// `c[2].png` without labels, plus a stray text file.
fn populate(dir: &Path) {
    RgbImage::new(100, 50)
        .save(dir.join("a.png"))
        .expect("save a.png");
    fs::write(dir.join("a.txt"), "0 0.5 0.5 0.2 0.2\n1 0.5 0.5 0.5 0.4\n").expect("a.txt");
    fs::write(dir.join("a_FH.png"), b"").expect("a_FH.png");
    fs::write(dir.join("a_FH.txt"), "0 0.5 0.5 0.2 0.2\n").expect("a_FH.txt");
    fs::write(dir.join("b.JPG"), b"").expect("b.JPG");
    fs::write(dir.join("b.txt"), "  \n\n").expect("b.txt");
    fs::write(dir.join("c[2].png"), b"").expect("c[2].png");
    fs::write(dir.join("notes.md"), "hello").expect("notes.md");
}

#[test]
fn scan_lists_images_sorted_by_name() {
    let tmp = tempfile::tempdir().expect("tempdir");
    populate(tmp.path());

    let entries = scan_dir(tmp.path(), &ScanFilter::default()).expect("scan");
    assert_eq!(names(&entries), ["a.png", "a_FH.png", "b.JPG", "c[2].png"]);
    assert_eq!(entries[0].label_path, tmp.path().join("a.txt"));
    assert!(entries[0].has_labels);
    assert!(!entries[2].has_labels);
    assert!(!entries[3].has_labels);
}

#[test]
fn label_filters_split_the_dataset() {
    let tmp = tempfile::tempdir().expect("tempdir");
    populate(tmp.path());

    let labelled = ScanFilter {
        labels: LabelFilter::Labelled,
        ..ScanFilter::default()
    };
    let entries = scan_dir(tmp.path(), &labelled).expect("scan");
    assert_eq!(names(&entries), ["a.png", "a_FH.png"]);

    let unlabelled = ScanFilter {
        labels: LabelFilter::Unlabelled,
        ..ScanFilter::default()
    };
    let entries = scan_dir(tmp.path(), &unlabelled).expect("scan");
    assert_eq!(names(&entries), ["b.JPG", "c[2].png"]);
}

#[test]
fn originals_only_hides_augmented_outputs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    populate(tmp.path());

    let filter = ScanFilter {
        originals_only: true,
        ..ScanFilter::default()
    };
    let entries = scan_dir(tmp.path(), &filter).expect("scan");
    assert_eq!(names(&entries), ["a.png", "b.JPG"]);
}

#[test]
fn name_filter_ignores_case() {
    let tmp = tempfile::tempdir().expect("tempdir");
    populate(tmp.path());

    let filter = ScanFilter {
        name_contains: Some("A_f".into()),
        ..ScanFilter::default()
    };
    let entries = scan_dir(tmp.path(), &filter).expect("scan");
    assert_eq!(names(&entries), ["a_FH.png"]);
}

#[test]
fn stats_report_extremes_in_pixels() {
    let tmp = tempfile::tempdir().expect("tempdir");
    populate(tmp.path());

    let entries = scan_dir(tmp.path(), &ScanFilter::default()).expect("scan");
    let stats = entries[0].stats().expect("stats");
    assert_eq!(stats.count, 2);
    assert_eq!(stats.largest.to_string(), "50 x 20");
    assert_eq!(stats.smallest.to_string(), "20 x 10");
}
