//! Filename sanitization for downloaded release assets.
//!
//! Asset names come from the release API and are used as file names inside
//! the download directory, so they must never resolve outside of it.

use std::path::{Component, Path, PathBuf};

/// Sanitizes an asset name for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

/// Returns the path an asset is saved to inside `dir`.
///
/// Existing files at that path are overwritten by the download.
#[must_use]
pub fn asset_file_path(dir: &Path, asset_name: &str) -> PathBuf {
    dir.join(sanitize_filename(asset_name))
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
