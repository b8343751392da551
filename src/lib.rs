//! Release Artifacts Core Library
//!
//! Fetches a tagged release from a GitHub-compatible release API, downloads
//! its `.tar.xz` / `.zip` archives, extracts them, and copies the shared
//! libraries they contain into an output directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`release`] - Paginated release and asset lookup
//! - [`download`] - Streaming asset downloads
//! - [`archive`] - Archive selection and extraction
//! - [`collect`] - Library pattern matching and copying
//! - [`pipeline`] - The end-to-end run tying the above together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod collect;
pub mod download;
pub mod pipeline;
pub mod release;
mod user_agent;

// Re-export commonly used types
pub use archive::{ArchiveError, ArchiveKind, filter_archives};
pub use collect::{
    CollectError, CollectOptions, CollectReport, DEFAULT_LIBRARY_PATTERNS, LibraryPattern,
    collect_artifacts,
};
pub use download::{DownloadError, HttpClient, HttpTimeouts, NoProgress, ProgressReporter};
pub use pipeline::{FetchPlan, PipelineError, RunSummary, fetch_artifacts};
pub use release::{Asset, DEFAULT_API_URL, Release, ReleaseClient, ReleaseError};
