use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested tile extent in pixels.
///
/// A zero dimension is representable; planning with it produces no tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors from parsing a `"<width>x<height>"` tile size.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TileSizeParseError {
    #[error("expected `<width>x<height>`, got {0:?}")]
    Format(String),
    #[error("invalid tile dimension {0:?}")]
    Dimension(String),
}

impl FromStr for TileSize {
    type Err = TileSizeParseError;

    /// Accepts `640x640`, `640 x 480` and `640X480`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(['x', 'X']);
        let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TileSizeParseError::Format(s.to_string()));
        };
        let parse = |raw: &str| {
            let raw = raw.trim();
            raw.parse::<u32>()
                .map_err(|_| TileSizeParseError::Dimension(raw.to_string()))
        };
        Ok(TileSize::new(parse(w)?, parse(h)?))
    }
}
