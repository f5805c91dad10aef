use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use image::{DynamicImage, Rgb, RgbImage};
use label_tiler::core::label::parse_labels;
use label_tiler::core::{ImageSize, LabelBox, TileSize, TilerParams};
use label_tiler::tile::{tile_file, tile_image};

fn write_sample(dir: &Path, name: &str, width: u32, height: u32, labels: &str) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 251) as u8, (y % 241) as u8, 90]));
    let path = dir.join(name);
    img.save(&path).expect("save sample image");
    fs::write(path.with_extension("txt"), labels).expect("write labels");
    path
}

fn assert_box(b: &LabelBox, expected: [f32; 4]) {
    assert_abs_diff_eq!(b.center_x, expected[0], epsilon = 1e-5);
    assert_abs_diff_eq!(b.center_y, expected[1], epsilon = 1e-5);
    assert_abs_diff_eq!(b.width, expected[2], epsilon = 1e-5);
    assert_abs_diff_eq!(b.height, expected[3], epsilon = 1e-5);
}

#[test]
fn centered_box_yields_one_renormalized_tile() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = write_sample(tmp.path(), "street.png", 1000, 800, "0 0.5 0.5 0.2 0.2\n");
    let out = tmp.path().join("tiles");

    let params = TilerParams::new(TileSize::new(400, 400));
    let report = tile_file(&src, &src.with_extension("txt"), &out, &params).expect("tile");
    assert_eq!(report.tiles(), 1);
    assert_eq!(report.outputs[0].image, out.join("street[1].png"));
    assert_eq!(report.outputs[0].labels, out.join("street[1].txt"));

    let tile = image::open(out.join("street[1].png")).expect("decode tile");
    assert_eq!((tile.width(), tile.height()), (400, 400));

    let text = fs::read_to_string(out.join("street[1].txt")).expect("read tile labels");
    let boxes = parse_labels(&text);
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0].class_id, 0);
    assert_box(&boxes[0], [0.5, 0.5, 0.5, 0.4]);
}

#[test]
fn tile_larger_than_image_writes_nothing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = write_sample(tmp.path(), "small.png", 1000, 800, "0 0.5 0.5 0.2 0.2\n");
    let out = tmp.path().join("tiles");

    let params = TilerParams::new(TileSize::new(2000, 2000));
    let report = tile_file(&src, &src.with_extension("txt"), &out, &params).expect("tile");
    assert_eq!(report.tiles(), 0);
    assert!(!out.exists());
}

#[test]
fn distant_boxes_get_separate_non_overlapping_tiles() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = write_sample(
        tmp.path(),
        "pair.png",
        1000,
        800,
        "0 0.1 0.1 0.1 0.1\n1 0.9 0.9 0.1 0.1\n",
    );

    let params = TilerParams::new(TileSize::new(300, 300));
    let report = tile_file(&src, &src.with_extension("txt"), tmp.path(), &params).expect("tile");
    assert_eq!(report.tiles(), 2);
    assert!(tmp.path().join("pair[1].png").is_file());
    assert!(tmp.path().join("pair[2].txt").is_file());

    let img = image::open(&src).expect("decode source");
    let crops = tile_image(&img, &parse_labels("0 0.1 0.1 0.1 0.1\n1 0.9 0.9 0.1 0.1\n"), &params);
    assert_eq!((crops[0].tile.rect.x, crops[0].tile.rect.y), (0, 0));
    assert_eq!((crops[1].tile.rect.x, crops[1].tile.rect.y), (700, 500));
    assert!(crops[0].tile.rect.iou(&crops[1].tile.rect) <= params.iou_threshold);
    assert!(crops.iter().all(|c| !c.tile.boxes.is_empty()));
}

#[test]
fn malformed_label_line_is_ignored() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = write_sample(
        tmp.path(),
        "mixed.png",
        1000,
        800,
        "abc 1 2 3\n0 0.5 0.5 0.2 0.2\n",
    );

    let params = TilerParams::new(TileSize::new(400, 400));
    let report = tile_file(&src, &src.with_extension("txt"), tmp.path(), &params).expect("tile");
    assert_eq!(report.tiles(), 1);
    let text = fs::read_to_string(&report.outputs[0].labels).expect("read tile labels");
    assert_eq!(parse_labels(&text).len(), 1);
}

#[test]
fn written_labels_match_planned_boxes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let labels = "2 0.13 0.21 0.07 0.05\n3 0.18 0.26 0.04 0.09\n0 0.71 0.64 0.12 0.1\n";
    let src = write_sample(tmp.path(), "dense.png", 1200, 900, labels);

    let params = TilerParams::new(TileSize::new(320, 320));
    let report = tile_file(&src, &src.with_extension("txt"), tmp.path(), &params).expect("tile");

    let img = DynamicImage::ImageRgb8(image::open(&src).expect("decode").to_rgb8());
    let crops = tile_image(&img, &parse_labels(labels), &params);
    assert!(!crops.is_empty());
    assert_eq!(report.tiles(), crops.len());

    let image_size = ImageSize::new(1200, 900);
    for (paths, crop) in report.outputs.iter().zip(&crops) {
        let written = parse_labels(&fs::read_to_string(&paths.labels).expect("read labels"));
        assert_eq!(written.len(), crop.tile.boxes.len());
        for (w, planned) in written.iter().zip(&crop.tile.boxes) {
            assert_eq!(w.class_id, planned.class_id);
            assert_box(
                w,
                [planned.center_x, planned.center_y, planned.width, planned.height],
            );
        }
        // Tiles lie inside the source image.
        let r = crop.tile.rect;
        assert!(r.x >= 0 && r.y >= 0);
        assert!(r.right() <= i64::from(image_size.width));
        assert!(r.bottom() <= i64::from(image_size.height));
    }
}
