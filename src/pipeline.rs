//! The fetch pipeline: resolve release, download and extract archives,
//! collect libraries.
//!
//! Steps run strictly in order and the first error aborts the run.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::archive::{self, ArchiveError, ArchiveKind};
use crate::collect::{self, CollectError, CollectOptions, CollectReport, LibraryPattern};
use crate::download::{DownloadError, HttpClient, ProgressReporter, asset_file_path};
use crate::release::{ReleaseClient, ReleaseError};

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub owner: String,
    pub repo: String,
    /// Release tag to fetch, matched exactly.
    pub tag: String,
    /// Where archives are saved and extracted.
    pub downloads_dir: PathBuf,
    /// Where collected libraries are copied.
    pub artifacts_dir: PathBuf,
    pub patterns: Vec<LibraryPattern>,
    /// Substring filters on archive names; empty keeps every archive.
    pub asset_filters: Vec<String>,
    pub collect: CollectOptions,
}

/// An archive that was downloaded and extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArchive {
    pub name: String,
    pub kind: ArchiveKind,
    pub path: PathBuf,
    pub bytes: u64,
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub release_id: u64,
    pub tag: String,
    pub archives: Vec<FetchedArchive>,
    /// Assets not downloaded: not an archive, or rejected by asset filters.
    pub skipped_assets: Vec<String>,
    pub report: CollectReport,
}

impl RunSummary {
    /// True when every library pattern produced an artifact.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.report.missing.is_empty()
    }
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Collect(#[from] CollectError),

    /// The download or artifacts directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The release has no archive left to download after filtering.
    #[error("release {tag} has no .tar.xz or .zip assets to download{}", filter_note(.filtered))]
    NoArchives { tag: String, filtered: bool },
}

fn filter_note(filtered: &bool) -> &'static str {
    if *filtered {
        " matching the asset filters"
    } else {
        ""
    }
}

/// Runs the whole pipeline for `plan`.
///
/// # Errors
///
/// Returns the first [`PipelineError`] hit by any step. An unknown tag is
/// [`PipelineError::Release`] wrapping [`ReleaseError::NotFound`], and in
/// that case nothing is downloaded or copied.
#[instrument(skip_all, fields(owner = %plan.owner, repo = %plan.repo, tag = %plan.tag))]
pub async fn fetch_artifacts(
    plan: &FetchPlan,
    releases: &ReleaseClient,
    http: &HttpClient,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary, PipelineError> {
    create_dir(&plan.downloads_dir).await?;
    create_dir(&plan.artifacts_dir).await?;

    let release = releases
        .find_release(&plan.owner, &plan.repo, &plan.tag)
        .await?;
    let assets = releases
        .list_assets(&plan.owner, &plan.repo, release.id)
        .await?;

    let archives = archive::filter_archives(&assets);
    let (selected, filtered_out): (Vec<_>, Vec<_>) = archives
        .into_iter()
        .partition(|a| archive::matches_asset_filters(&a.asset.name, &plan.asset_filters));

    let mut skipped_assets: Vec<String> = assets
        .iter()
        .filter(|a| ArchiveKind::from_name(&a.name).is_none())
        .map(|a| a.name.clone())
        .collect();
    skipped_assets.extend(filtered_out.into_iter().map(|a| a.asset.name));
    for name in &skipped_assets {
        debug!(asset = %name, "skipping asset");
    }

    if selected.is_empty() {
        return Err(PipelineError::NoArchives {
            tag: release.tag_name,
            filtered: !plan.asset_filters.is_empty(),
        });
    }
    info!(
        release_id = release.id,
        archives = selected.len(),
        skipped = skipped_assets.len(),
        "downloading release archives"
    );

    let mut fetched = Vec::with_capacity(selected.len());
    for entry in selected {
        let dest = asset_file_path(&plan.downloads_dir, &entry.asset.name);
        let file = http
            .download_to_path(&entry.asset.browser_download_url, &dest, progress)
            .await?;
        archive::extract_archive(&file.path, entry.kind, &plan.downloads_dir).await?;
        info!(asset = %entry.asset.name, kind = %entry.kind, "archive extracted");
        fetched.push(FetchedArchive {
            name: entry.asset.name,
            kind: entry.kind,
            path: file.path,
            bytes: file.bytes_written,
        });
    }

    let report = collect::collect_artifacts_async(
        plan.downloads_dir.clone(),
        plan.patterns.clone(),
        plan.artifacts_dir.clone(),
        plan.collect.clone(),
    )
    .await?;

    Ok(RunSummary {
        release_id: release.id,
        tag: release.tag_name,
        archives: fetched,
        skipped_assets,
        report,
    })
}

async fn create_dir(path: &Path) -> Result<(), PipelineError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| PipelineError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}
