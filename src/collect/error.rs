//! Error types for artifact collection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while searching extracted trees and copying libraries.
#[derive(Debug, Error)]
pub enum CollectError {
    /// A library pattern is empty, contains a path separator, or does not
    /// compile.
    #[error("invalid library pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Walking the search tree failed.
    #[error("failed to search {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Creating the output directory or copying a library failed.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Strict mode: some patterns matched no file.
    #[error("no file matched library pattern(s): {}", patterns.join(", "))]
    Missing { patterns: Vec<String> },
}

impl CollectError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_patterns() {
        let error = CollectError::Missing {
            patterns: vec!["libopenslide.so".to_string(), "libopenslide*.dll".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "no file matched library pattern(s): libopenslide.so, libopenslide*.dll"
        );
    }
}
