//! Client payload installation.
//!
//! The payload for a version is a zip archive extracted into the version
//! directory. Installation is all-or-nothing from the point of view of later
//! runs. The completion sentinel is written only after every step before it
//! has succeeded, and a directory without the sentinel is always cleared and
//! reinstalled from scratch.
//!
//! # Steps
//!
//! 1. Clear the version directory, keeping the bootstrapper
//! 2. Download the archive to `Downloads/<sha256(url)>`
//! 3. Validate the archive
//! 4. Extract it into the payload directory
//! 5. Register the URI scheme (failure is logged, not fatal)
//! 6. Write the sentinel
//! 7. Remove `Downloads/` and purge stale versions
//!
//! Any failure in steps 1 to 4 or 6 aborts with no sentinel written.

pub mod archive;
pub mod sentinel;

use crate::config::LauncherConfig;
use crate::net::{DownloadLimits, Transport};
use crate::platform::OsIntegration;
use crate::resolver::Resolution;
use crate::store::InstallationStore;
use crate::utils::fs::{ensure_dir, remove_path};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// What [`PayloadInstaller::install`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    /// The sentinel was already present; nothing was touched.
    AlreadyInstalled,
    Installed {
        files: usize,
        purged_versions: usize,
    },
}

pub struct PayloadInstaller<'a, T, O> {
    config: &'a LauncherConfig,
    store: &'a InstallationStore,
    transport: &'a T,
    integration: &'a O,
    resolution: &'a Resolution,
}

impl<'a, T: Transport, O: OsIntegration> PayloadInstaller<'a, T, O> {
    pub fn new(
        config: &'a LauncherConfig,
        store: &'a InstallationStore,
        transport: &'a T,
        integration: &'a O,
        resolution: &'a Resolution,
    ) -> Self {
        Self {
            config,
            store,
            transport,
            integration,
            resolution,
        }
    }

    pub fn archive_url(&self) -> String {
        self.resolution
            .endpoint
            .artifact_url(&self.resolution.version, &self.config.client_archive_suffix)
    }

    /// Installs the payload for the resolved version unless the sentinel
    /// says it is already installed.
    pub async fn install(&self) -> Result<InstallStatus> {
        let version = &self.resolution.version;
        if self.store.is_installed(version) {
            debug!("Client {version} already installed");
            return Ok(InstallStatus::AlreadyInstalled);
        }

        info!("Installing client {version}");
        self.store
            .clear_version_dir_except_bootstrapper(version)
            .context("Failed to prepare the version directory")?;

        let url = self.archive_url();
        ensure_dir(&self.store.downloads_dir())?;
        let archive_path = self.store.download_path_for(&url);

        let files = match self.fetch_and_extract(&url, &archive_path).await {
            Ok(files) => files,
            Err(e) => {
                if let Err(cleanup) = remove_path(&archive_path) {
                    warn!("Failed to remove {}: {cleanup:#}", archive_path.display());
                }
                return Err(e);
            }
        };

        let bootstrapper = self.store.bootstrapper_path(version);
        if let Err(e) = self.integration.register_scheme(&self.config.url_scheme, &bootstrapper) {
            warn!("Failed to register {}:// handler: {e:#}", self.config.url_scheme);
        }

        sentinel::write_sentinel(&self.store.sentinel_path(version), &self.config.base_host)?;
        info!("Client {version} installed");

        self.store.remove_downloads();
        let purged_versions = self.store.purge_stale_versions(version);

        Ok(InstallStatus::Installed {
            files,
            purged_versions,
        })
    }

    async fn fetch_and_extract(&self, url: &str, archive_path: &Path) -> Result<usize> {
        self.transport
            .download(url, archive_path, DownloadLimits::from_config(self.config))
            .await?;

        archive::validate_archive(archive_path)?;

        let payload_dir = self.store.payload_dir(&self.resolution.version);
        info!("Extracting client to {}", payload_dir.display());
        archive::extract_archive(archive_path, &payload_dir)
    }
}
