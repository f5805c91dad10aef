use std::path::{Path, PathBuf};

use label_tiler_core::TileSizeParseError;

/// Errors produced by the file-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum TilerError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TileSize(#[from] TileSizeParseError),

    #[error("tiling needs a tile size (`--size <width>x<height>`)")]
    MissingTileSize,

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} has no file name stem", .0.display())]
    NoFileStem(PathBuf),
}

impl TilerError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        TilerError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn image(path: &Path, source: image::ImageError) -> Self {
        TilerError::Image {
            path: path.to_path_buf(),
            source,
        }
    }
}
