//! Archive selection and extraction for release assets.
//!
//! Only two formats are recognized, by file name suffix: `.tar.xz` and
//! `.zip`. Every other asset (checksums, signatures, source tarballs in other
//! compressions) is ignored.

mod error;
mod extract;

pub use error::ArchiveError;
pub use extract::{extract_archive, extract_archive_blocking};

use std::fmt;

use crate::release::Asset;

/// Archive formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// xz-compressed tarball.
    TarXz,
    /// Zip archive.
    Zip,
}

impl ArchiveKind {
    /// Infers the archive kind from a file name suffix.
    ///
    /// Matching is case-sensitive: `lib.ZIP` is not an archive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::TarXz, Self::Zip]
            .into_iter()
            .find(|kind| name.ends_with(kind.suffix()))
    }

    /// The suffix this kind is recognized by.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::TarXz => ".tar.xz",
            Self::Zip => ".zip",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TarXz => "tar.xz",
            Self::Zip => "zip",
        };
        write!(f, "{label}")
    }
}

/// A release asset recognized as an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveAsset {
    pub asset: Asset,
    pub kind: ArchiveKind,
}

/// Keeps the assets whose names end in `.tar.xz` or `.zip`, in API order.
#[must_use]
pub fn filter_archives(assets: &[Asset]) -> Vec<ArchiveAsset> {
    assets
        .iter()
        .filter_map(|asset| {
            ArchiveKind::from_name(&asset.name).map(|kind| ArchiveAsset {
                asset: asset.clone(),
                kind,
            })
        })
        .collect()
}

/// Returns true when `name` passes the user's asset filters.
///
/// An empty filter list accepts everything; otherwise at least one filter
/// must occur in the name as a substring.
#[must_use]
pub fn matches_asset_filters(name: &str, filters: &[String]) -> bool {
    filters.is_empty() || filters.iter().any(|filter| name.contains(filter.as_str()))
}
