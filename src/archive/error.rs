//! Error types for archive extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while unpacking a downloaded archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Reading the archive or writing an entry failed (includes corrupt
    /// `.tar.xz` streams and entries that would escape the destination).
    #[error("failed to extract {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The zip central directory or an entry could not be read.
    #[error("failed to extract zip {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}
