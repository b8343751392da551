//! HTTP download of release assets, streamed to disk.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large archives)
//! - Configurable timeouts (30s connect, 5min total by default)
//! - Structured error types with full context
//! - Partial files removed on failure
//!
//! No retry and no checksum verification: a failed download fails the run.

mod client;
mod constants;
mod error;
mod filename;
mod progress;

pub use client::{DownloadedFile, HttpClient, HttpTimeouts};
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::asset_file_path;
pub use progress::{NoProgress, ProgressReporter};
