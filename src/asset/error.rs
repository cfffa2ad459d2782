//! Asset resolution errors.

use std::io;
use thiserror::Error;

/// Errors surfaced while resolving an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The path exists but names a directory. Directories are never served.
    #[error("asset is a directory: {0}")]
    Directory(String),

    #[error("I/O error when reading `{path}`")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    /// Map an I/O error from the backing lookup, keeping absence distinct.
    pub fn from_io(path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                Self::NotFound(path.to_string())
            }
            _ => Self::Io {
                path: path.to_string(),
                source: err,
            },
        }
    }

    /// True for outcomes rendered as "404 Not Found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Directory(_))
    }
}

/// Result type for asset operations.
pub type AssetResult<T> = std::result::Result<T, AssetError>;
