//! HTTP client wrapper for downloading release assets.
//!
//! This module provides the `HttpClient` struct which streams asset bodies to
//! disk with timeout configuration and cleanup of partial files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::progress::ProgressReporter;
use crate::user_agent;

/// Connect and total-request timeouts shared by the HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// TCP/TLS connect timeout in seconds.
    pub connect_secs: u64,
    /// Whole-request timeout in seconds (covers streaming the body).
    pub read_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for downloading assets with streaming support.
///
/// Created once per run and reused for every asset, taking advantage of
/// connection pooling.
///
/// # Example
///
/// ```no_run
/// use release_artifacts::download::{HttpClient, HttpTimeouts, NoProgress};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(HttpTimeouts::default())?;
/// let file = client
///     .download_to_path(
///         "https://example.com/lib.zip",
///         Path::new("./downloads/lib.zip"),
///         &NoProgress,
///     )
///     .await?;
/// println!("Downloaded {} bytes", file.bytes_written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Final output path.
    pub path: PathBuf,
    /// Bytes written to disk.
    pub bytes_written: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the given timeouts.
    ///
    /// Redirects are followed (release asset URLs redirect to a storage host)
    /// and gzip transfer encoding is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the TLS backend or client
    /// configuration cannot be initialized.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.read_secs))
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .map_err(|source| DownloadError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Downloads `url` to exactly `dest`, overwriting any existing file.
    ///
    /// The body is streamed in chunks; `progress` is told about each chunk.
    /// On any failure after the file was created, the partial file is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Writing to disk fails
    #[must_use = "download result contains the path and size of the file"]
    #[instrument(skip(self, progress), fields(url = %url, dest = %dest.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        dest: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<DownloadedFile, DownloadError> {
        debug!("starting download");

        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::from_request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_length = response.content_length();
        let display_name = dest
            .file_name()
            .map_or_else(|| url.to_string(), |n| n.to_string_lossy().into_owned());

        let mut file = File::create(dest)
            .await
            .map_err(|e| DownloadError::io(dest, e))?;

        progress.started(&display_name, content_length);
        let stream_result = stream_to_file(&mut file, response, url, dest, progress).await;
        progress.finished(&display_name);

        if stream_result.is_err() {
            debug!(path = %dest.display(), "cleaning up partial file after error");
            drop(file);
            let _ = tokio::fs::remove_file(dest).await;
        }
        let bytes_written = stream_result?;

        info!(path = %dest.display(), bytes = bytes_written, "download complete");

        Ok(DownloadedFile {
            path: dest.to_path_buf(),
            bytes_written,
        })
    }
}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    progress: &dyn ProgressReporter,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_request(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        let len = chunk.len() as u64;
        bytes_written += len;
        progress.advanced(len);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}
