use serde::{Deserialize, Serialize};

use crate::TileSize;

/// Overlap above which a candidate tile counts as a near-duplicate of an
/// already emitted one.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.3;

fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

/// Configuration of one tiling run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilerParams {
    /// Fixed extent of every emitted tile, in pixels.
    pub tile_size: TileSize,
    /// A candidate is rejected when its IoU with any emitted tile of the same
    /// image is strictly greater than this value.
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,
}

impl TilerParams {
    pub fn new(tile_size: TileSize) -> Self {
        Self {
            tile_size,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f64) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_threshold_defaults_when_missing_from_json() {
        let params: TilerParams =
            serde_json::from_str(r#"{"tile_size": {"width": 640, "height": 480}}"#)
                .expect("parse params");
        assert_eq!(params, TilerParams::new(TileSize::new(640, 480)));
        assert_eq!(params.iou_threshold, DEFAULT_IOU_THRESHOLD);
    }

    #[test]
    fn explicit_threshold_overrides_default() {
        let params: TilerParams = serde_json::from_str(
            r#"{"tile_size": {"width": 64, "height": 64}, "iou_threshold": 0.5}"#,
        )
        .expect("parse params");
        assert_eq!(params.iou_threshold, 0.5);
    }
}
