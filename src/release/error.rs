//! Error types for release API lookups.

use thiserror::Error;

/// Errors raised while querying the release API.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Connection, DNS or TLS failure talking to the API.
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The endpoint being requested.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API did not answer within the configured timeout.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The endpoint being requested.
        url: String,
    },

    /// The API answered with a non-success status (403 when rate limited).
    #[error("HTTP {status} from release API at {url}")]
    HttpStatus {
        /// The endpoint being requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// The endpoint being requested.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API base URL or a path built from it is not a valid URL.
    #[error("invalid release API URL: {url}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
    },

    /// No release in the repository carries the requested tag.
    #[error("release {tag} not found in {owner}/{repo} (scanned {scanned} releases)")]
    NotFound {
        owner: String,
        repo: String,
        tag: String,
        /// Number of releases inspected before giving up.
        scanned: usize,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build release API client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

impl ReleaseError {
    /// Maps a request error to `Timeout` or `Network`.
    pub(crate) fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub(crate) fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a not-found error for `owner/repo@tag`.
    pub(crate) fn not_found(owner: &str, repo: &str, tag: &str, scanned: usize) -> Self {
        Self::NotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.to_string(),
            scanned,
        }
    }

    /// Returns true when the requested tag does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_names_tag_and_repo() {
        let error = ReleaseError::not_found("openslide", "openslide-bin", "v9.9.9", 42);
        let msg = error.to_string();
        assert!(msg.contains("v9.9.9"), "Expected tag in: {msg}");
        assert!(msg.contains("openslide/openslide-bin"), "Expected repo in: {msg}");
        assert!(msg.contains("42"), "Expected scanned count in: {msg}");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_http_status_display() {
        let error = ReleaseError::http_status("https://api.github.com/repos/a/b/releases", 403);
        let msg = error.to_string();
        assert!(msg.contains("403"), "Expected status in: {msg}");
        assert!(!error.is_not_found());
    }
}
