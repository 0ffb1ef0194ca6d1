//! Client archive validation and extraction.

use crate::core::LauncherError;
use crate::utils::fs::ensure_dir;
use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

fn archive_error(path: &Path, reason: impl ToString) -> LauncherError {
    LauncherError::Archive {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn open(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(ZipArchive::new(file).map_err(|e| archive_error(path, e))?)
}

/// Reads every entry to the end so truncation and CRC mismatches surface
/// before anything is written to the install directory. Returns the number
/// of entries.
pub fn validate_archive(path: &Path) -> Result<usize> {
    let mut archive = open(path)?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| archive_error(path, e))?;
        io::copy(&mut entry, &mut io::sink())
            .map_err(|e| archive_error(path, format!("entry {}: {e}", entry.name())))?;
    }
    debug!("Validated {} entries in {}", archive.len(), path.display());
    Ok(archive.len())
}

/// Extracts `path` into `dest`, returning the number of files written.
///
/// Entries whose names would escape `dest` (absolute paths, `..`) are
/// refused and fail the whole extraction.
pub fn extract_archive(path: &Path, dest: &Path) -> Result<usize> {
    let mut archive = open(path)?;
    ensure_dir(dest)?;

    let mut files = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| archive_error(path, e))?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| archive_error(path, format!("unsafe entry name: {}", entry.name())))?;
        let target = dest.join(relative);

        if entry.is_dir() {
            ensure_dir(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        let mut out = File::create(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
        io::copy(&mut entry, &mut out)
            .map_err(|e| archive_error(path, format!("entry {}: {e}", entry.name())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode().filter(|m| m & 0o777 != 0) {
                std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode & 0o777))
                    .with_context(|| format!("Failed to set permissions on {}", target.display()))?;
            }
        }

        files += 1;
    }
    Ok(files)
}
