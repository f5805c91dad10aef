//! Plain-text label format: `<class> <cx> <cy> <w> <h>` per line.
//!
//! Reading is best-effort. A line that does not split into exactly one
//! integer and four finite floats, or whose box breaks the size invariant,
//! is skipped; the rest of the file still loads.

use std::fmt::Write as _;

use log::debug;

use crate::LabelBox;

/// Parse a single label line. Returns `None` for blank, malformed or
/// out-of-range lines.
pub fn parse_line(line: &str) -> Option<LabelBox> {
    let mut tokens = line.split_whitespace();
    let class_id = tokens.next()?.parse::<i32>().ok()?;
    let mut values = [0.0f32; 4];
    for v in &mut values {
        *v = tokens.next()?.parse::<f32>().ok()?;
    }
    if tokens.next().is_some() || !values.iter().all(|v| v.is_finite()) {
        return None;
    }

    let [cx, cy, w, h] = values;
    let b = LabelBox::new(class_id, cx, cy, w, h);
    b.has_valid_size().then_some(b)
}

/// Parse a whole label file, keeping every well-formed box in file order.
pub fn parse_labels(text: &str) -> Vec<LabelBox> {
    let mut boxes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(b) => boxes.push(b),
            None => debug!("skipping label line {}: {:?}", idx + 1, line),
        }
    }
    boxes
}

/// Format one box with six decimals per coordinate.
pub fn format_line(b: &LabelBox) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        b.class_id, b.center_x, b.center_y, b.width, b.height
    )
}

/// Format boxes as label file contents, one newline-terminated line each.
pub fn format_labels(boxes: &[LabelBox]) -> String {
    let mut out = String::with_capacity(boxes.len() * 48);
    for b in boxes {
        let _ = writeln!(out, "{}", format_line(b));
    }
    out
}
