//! Artifact collection: find library files in extracted archives and copy
//! them into the output directory.
//!
//! Each pattern selects at most one file. When several files match (the same
//! library shipped for several architectures), the one whose path names the
//! host architecture wins, then the first in sorted path order.

mod error;
mod pattern;

pub use error::CollectError;
pub use pattern::{DEFAULT_LIBRARY_PATTERNS, LibraryPattern, compile_patterns, default_patterns};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Options controlling candidate selection and missing-match handling.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Fail with [`CollectError::Missing`] when a pattern matches nothing.
    pub strict: bool,
    /// Architecture used to break ties between candidates
    /// (defaults to `std::env::consts::ARCH`).
    pub host_arch: String,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            strict: false,
            host_arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// One library copied into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedArtifact {
    /// Pattern that selected the file.
    pub pattern: String,
    /// Path inside the search tree (may be a symlink).
    pub source: PathBuf,
    /// Path written in the output directory.
    pub dest: PathBuf,
    /// Bytes copied (size of the symlink target, not the link).
    pub bytes: u64,
    /// Other matches for the same pattern that were not copied.
    pub ignored: Vec<PathBuf>,
}

/// Outcome of a collection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub copied: Vec<CopiedArtifact>,
    /// Patterns that matched no file.
    pub missing: Vec<String>,
}

/// Finds, for every pattern, all files under `root` whose name matches.
///
/// The result has one entry per pattern, each sorted by path. Symlinks
/// count when they resolve to a regular file. Anything under `exclude` is
/// skipped.
///
/// # Errors
///
/// Returns [`CollectError::Walk`] if the tree cannot be read.
pub fn find_candidates(
    root: &Path,
    patterns: &[LibraryPattern],
    exclude: Option<&Path>,
) -> Result<Vec<Vec<PathBuf>>, CollectError> {
    let mut found = vec![Vec::new(); patterns.len()];

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| exclude.is_none_or(|ex| !entry.path().starts_with(ex)));

    for entry in walker {
        let entry = entry.map_err(|source| CollectError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let matching: Vec<usize> = patterns
            .iter()
            .enumerate()
            .filter(|(_, pattern)| pattern.matches(&name))
            .map(|(index, _)| index)
            .collect();
        if matching.is_empty() {
            continue;
        }

        if file_type.is_symlink() && !fs::metadata(entry.path()).is_ok_and(|m| m.is_file()) {
            warn!(path = %entry.path().display(), "skipping symlink that does not resolve to a file");
            continue;
        }

        for index in matching {
            found[index].push(entry.path().to_path_buf());
        }
    }

    for paths in &mut found {
        paths.sort();
    }
    Ok(found)
}

/// Picks one candidate: the first naming the host architecture, otherwise
/// the first in order.
///
/// Only the part of each path below `search_root` is checked for the
/// architecture, so the location of the search tree itself never decides.
#[must_use]
pub fn select_candidate<'a>(
    candidates: &'a [PathBuf],
    search_root: &Path,
    host_arch: &str,
) -> Option<&'a PathBuf> {
    let aliases = arch_aliases(host_arch);
    candidates
        .iter()
        .find(|path| {
            let relative = path.strip_prefix(search_root).unwrap_or(path.as_path());
            let text = relative.to_string_lossy();
            aliases.iter().any(|alias| text.contains(alias))
        })
        .or_else(|| candidates.first())
}

/// Searches `search_root` for every pattern and copies the selected match
/// into `output_dir`, following symlinks.
///
/// `output_dir` is created if missing and excluded from the search.
///
/// # Errors
///
/// Returns [`CollectError`] if the tree cannot be walked, a copy fails, or
/// (with `strict`) a pattern matches nothing.
pub fn collect_artifacts(
    search_root: &Path,
    patterns: &[LibraryPattern],
    output_dir: &Path,
    options: &CollectOptions,
) -> Result<CollectReport, CollectError> {
    fs::create_dir_all(output_dir).map_err(|e| CollectError::io(output_dir, e))?;

    let candidates = find_candidates(search_root, patterns, Some(output_dir))?;
    let mut report = CollectReport::default();

    for (pattern, matches) in patterns.iter().zip(candidates) {
        let Some(selected) = select_candidate(&matches, search_root, &options.host_arch) else {
            warn!(pattern = %pattern, root = %search_root.display(), "no file matched library pattern");
            report.missing.push(pattern.as_str().to_string());
            continue;
        };

        let ignored: Vec<PathBuf> = matches.iter().filter(|p| *p != selected).cloned().collect();
        if !ignored.is_empty() {
            warn!(
                pattern = %pattern,
                selected = %selected.display(),
                ignored = ?ignored,
                "several files matched library pattern; copying one"
            );
        }

        let artifact = copy_artifact(pattern, selected, output_dir, ignored)?;
        info!(
            pattern = %pattern,
            source = %artifact.source.display(),
            dest = %artifact.dest.display(),
            bytes = artifact.bytes,
            "artifact copied"
        );
        report.copied.push(artifact);
    }

    if options.strict && !report.missing.is_empty() {
        return Err(CollectError::Missing {
            patterns: report.missing,
        });
    }
    Ok(report)
}

/// [`collect_artifacts`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`collect_artifacts`]. A panicked task surfaces as
/// [`CollectError::Io`].
pub async fn collect_artifacts_async(
    search_root: PathBuf,
    patterns: Vec<LibraryPattern>,
    output_dir: PathBuf,
    options: CollectOptions,
) -> Result<CollectReport, CollectError> {
    let task_dir = output_dir.clone();
    tokio::task::spawn_blocking(move || {
        collect_artifacts(&search_root, &patterns, &output_dir, &options)
    })
    .await
    .map_err(|e| CollectError::io(task_dir, std::io::Error::other(e)))?
}

fn copy_artifact(
    pattern: &LibraryPattern,
    source: &Path,
    output_dir: &Path,
    ignored: Vec<PathBuf>,
) -> Result<CopiedArtifact, CollectError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| CollectError::io(source, std::io::Error::other("path has no file name")))?;
    let dest = output_dir.join(file_name);
    debug!(source = %source.display(), dest = %dest.display(), "copying");

    // A stale symlink at `dest` would make `fs::copy` write through it.
    if fs::symlink_metadata(&dest).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(&dest).map_err(|e| CollectError::io(&dest, e))?;
    }
    let bytes = fs::copy(source, &dest).map_err(|e| CollectError::io(source, e))?;

    Ok(CopiedArtifact {
        pattern: pattern.as_str().to_string(),
        source: source.to_path_buf(),
        dest,
        bytes,
        ignored,
    })
}

fn arch_aliases(arch: &str) -> &'static [&'static str] {
    match arch {
        "x86_64" => &["x86_64", "amd64", "x64"],
        "aarch64" => &["aarch64", "arm64"],
        "x86" => &["i686", "i386", "x86-"],
        "arm" => &["armv7", "armhf"],
        _ => &[],
    }
}
