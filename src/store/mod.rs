//! On-disk installation layout.
//!
//! ```text
//! <root>/
//! ├── launcher.toml              optional config override
//! ├── winepath.txt               optional compatibility layer path
//! ├── Downloads/                 temporary archives, removed after install
//! └── Versions/
//!     └── <sanitized version>/
//!         ├── <bootstrapper>     published launcher binary
//!         ├── AppSettings.xml    completion sentinel
//!         └── Client2021/        extracted client payload
//! ```
//!
//! Only one version directory is current per run. Every other directory under
//! `Versions/` is stale and removed after a successful install.

use crate::config::LauncherConfig;
use crate::constants::{DOWNLOADS_DIR, VERSIONS_DIR};
use crate::core::Version;
use crate::upgrade::verification::ChecksumVerifier;
use crate::utils::fs::{ensure_dir, remove_path};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Paths and housekeeping for one installation root.
#[derive(Debug, Clone)]
pub struct InstallationStore {
    root: PathBuf,
    bootstrapper_filename: String,
    client_dir_name: String,
    client_executable: String,
    sentinel_name: String,
    compat_config_name: String,
}

impl InstallationStore {
    pub fn new(root: impl Into<PathBuf>, config: &LauncherConfig) -> Self {
        Self {
            root: root.into(),
            bootstrapper_filename: config.bootstrapper_filename.clone(),
            client_dir_name: config.client_dir_name.clone(),
            client_executable: config.client_executable.clone(),
            sentinel_name: config.sentinel_name.clone(),
            compat_config_name: config.compat_config_name.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join(VERSIONS_DIR)
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.root.join(DOWNLOADS_DIR)
    }

    /// Always keyed by the sanitized token.
    pub fn version_dir(&self, version: &Version) -> PathBuf {
        self.versions_dir().join(version.sanitized())
    }

    pub fn bootstrapper_path(&self, version: &Version) -> PathBuf {
        self.version_dir(version).join(&self.bootstrapper_filename)
    }

    pub fn sentinel_path(&self, version: &Version) -> PathBuf {
        self.version_dir(version).join(&self.sentinel_name)
    }

    pub fn payload_dir(&self, version: &Version) -> PathBuf {
        self.version_dir(version).join(&self.client_dir_name)
    }

    pub fn client_executable_path(&self, version: &Version) -> PathBuf {
        self.payload_dir(version).join(&self.client_executable)
    }

    pub fn compat_config_path(&self) -> PathBuf {
        self.root.join(&self.compat_config_name)
    }

    /// Temp file for a download, named by the SHA-256 of its URL.
    pub fn download_path_for(&self, url: &str) -> PathBuf {
        self.downloads_dir().join(ChecksumVerifier::digest_str(url))
    }

    /// Whether the sentinel exists, i.e. the payload was fully extracted.
    pub fn is_installed(&self, version: &Version) -> bool {
        self.sentinel_path(version).is_file()
    }

    /// Creates the root, `Versions/`, `Downloads/` and the version directory.
    /// Safe to call on every run.
    pub fn ensure_layout(&self, version: &Version) -> Result<PathBuf> {
        let version_dir = self.version_dir(version);
        for dir in [self.root.clone(), self.versions_dir(), self.downloads_dir(), version_dir.clone()] {
            if !dir.is_dir() {
                debug!("Creating folder {}", dir.display());
            }
            ensure_dir(&dir)?;
        }
        Ok(version_dir)
    }

    /// Empties the version directory, keeping only the bootstrapper binary.
    ///
    /// Used before (re)installing so leftovers from an interrupted extraction
    /// never mix with a fresh payload.
    pub fn clear_version_dir_except_bootstrapper(&self, version: &Version) -> Result<()> {
        let version_dir = self.version_dir(version);
        let entries = fs::read_dir(&version_dir)
            .with_context(|| format!("Failed to read {}", version_dir.display()))?;

        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to read {}", version_dir.display()))?;
            if entry.file_name() == self.bootstrapper_filename.as_str() {
                continue;
            }
            debug!("Removing {}", entry.path().display());
            remove_path(&entry.path())?;
        }
        Ok(())
    }

    /// Deletes every directory under `Versions/` except the current one.
    ///
    /// Failures are logged and skipped; returns how many were removed.
    pub fn purge_stale_versions(&self, current: &Version) -> usize {
        let versions_dir = self.versions_dir();
        let entries = match fs::read_dir(&versions_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not list {}: {e}", versions_dir.display());
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            if entry.file_name() == current.sanitized() {
                continue;
            }
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match fs::remove_dir_all(&path) {
                Ok(()) => {
                    info!("Removed old version {}", path.display());
                    removed += 1;
                }
                Err(e) => warn!("Failed to remove old version {}: {e}", path.display()),
            }
        }
        removed
    }

    /// Removes `Downloads/`. Failure is logged only.
    pub fn remove_downloads(&self) {
        let downloads = self.downloads_dir();
        if let Err(e) = remove_path(&downloads) {
            warn!("Failed to clean up {}: {e:#}", downloads.display());
        }
    }
}
