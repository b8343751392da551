//! Unpacking of `.tar.xz` and `.zip` archives into a directory.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tar::Archive;
use tracing::{debug, instrument};
use xz2::read::XzDecoder;
use zip::ZipArchive;

use super::ArchiveKind;
use super::error::ArchiveError;

/// Extracts `archive` into `dest` on the blocking thread pool.
///
/// Existing files in `dest` are overwritten.
///
/// # Errors
///
/// Returns [`ArchiveError`] when the archive cannot be read or an entry
/// cannot be written.
pub async fn extract_archive(
    archive: &Path,
    kind: ArchiveKind,
    dest: &Path,
) -> Result<(), ArchiveError> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || extract_archive_blocking(&archive, kind, &dest))
        .await
        .map_err(|source| ArchiveError::Task { source })?
}

/// Synchronous form of [`extract_archive`].
///
/// # Errors
///
/// Returns [`ArchiveError`] when the archive cannot be read or an entry
/// cannot be written.
#[instrument(fields(archive = %archive.display(), dest = %dest.display()))]
pub fn extract_archive_blocking(
    archive: &Path,
    kind: ArchiveKind,
    dest: &Path,
) -> Result<(), ArchiveError> {
    std::fs::create_dir_all(dest).map_err(|e| ArchiveError::io(dest, e))?;
    match kind {
        ArchiveKind::TarXz => unpack_tar_xz(archive, dest)?,
        ArchiveKind::Zip => unpack_zip(archive, dest)?,
    }
    debug!(%kind, "archive extracted");
    Ok(())
}

fn unpack_tar_xz(archive: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive).map_err(|e| ArchiveError::io(archive, e))?;
    let mut tar = Archive::new(XzDecoder::new(BufReader::new(file)));
    tar.set_overwrite(true);
    tar.set_preserve_permissions(true);
    // `unpack` refuses entries with `..` or absolute paths.
    tar.unpack(dest).map_err(|e| ArchiveError::io(archive, e))
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::open(archive).map_err(|e| ArchiveError::io(archive, e))?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| ArchiveError::zip(archive, e))?;
    // `extract` only writes entries whose enclosed name stays inside `dest`.
    zip.extract(dest).map_err(|e| ArchiveError::zip(archive, e))
}
