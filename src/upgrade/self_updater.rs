use super::verification::ChecksumVerifier;
use crate::core::LauncherError;
use crate::net::{DownloadLimits, Transport};
use crate::platform::{CommandSpec, OsIntegration, ProcessSpawner};
use crate::resolver::Resolution;
use crate::store::InstallationStore;
use crate::utils::fs::remove_path;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the running binary stands relative to the published bootstrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// The published bootstrapper has not been downloaded yet.
    NeedBootstrapper,
    /// The running binary is the published one; continue in-process.
    UpToDate,
    /// The running binary differs; start the published one and exit.
    Handoff,
}

/// Keeps the launcher running as the exact bootstrapper published for the
/// resolved version.
///
/// The stored bootstrapper lives in the version directory. The running
/// executable is compared to it by SHA-256 content hash. Any difference at
/// all, older or newer, hands off to the stored copy, so install and launch
/// logic only ever runs in the published binary.
pub struct SelfUpdateGate<'a, T> {
    store: &'a InstallationStore,
    transport: &'a T,
    resolution: &'a Resolution,
    bootstrapper_filename: &'a str,
    limits: DownloadLimits,
}

impl<'a, T: Transport> SelfUpdateGate<'a, T> {
    pub fn new(
        store: &'a InstallationStore,
        transport: &'a T,
        resolution: &'a Resolution,
        bootstrapper_filename: &'a str,
        limits: DownloadLimits,
    ) -> Self {
        Self {
            store,
            transport,
            resolution,
            bootstrapper_filename,
            limits,
        }
    }

    pub fn bootstrapper_path(&self) -> PathBuf {
        self.store.bootstrapper_path(&self.resolution.version)
    }

    pub fn bootstrapper_url(&self) -> String {
        self.resolution.endpoint.artifact_url(&self.resolution.version, self.bootstrapper_filename)
    }

    /// Downloads the published bootstrapper if it is not stored yet.
    pub async fn ensure_bootstrapper(&self, integration: &impl OsIntegration) -> Result<PathBuf> {
        let path = self.bootstrapper_path();
        if path.is_file() {
            debug!("Bootstrapper already present at {}", path.display());
            return Ok(path);
        }
        info!("Downloading the latest bootstrapper");
        self.download_bootstrapper(integration).await?;
        Ok(path)
    }

    /// Compares `current_exe` with the stored bootstrapper.
    ///
    /// Running the stored binary itself is up to date without hashing.
    pub async fn evaluate(&self, current_exe: &Path) -> Result<GateState> {
        let stored = self.bootstrapper_path();
        if !stored.is_file() {
            return Ok(GateState::NeedBootstrapper);
        }

        if same_file(current_exe, &stored) {
            debug!("Running from the stored bootstrapper");
            return Ok(GateState::UpToDate);
        }

        if ChecksumVerifier::files_match(current_exe, &stored).await? {
            Ok(GateState::UpToDate)
        } else {
            Ok(GateState::Handoff)
        }
    }

    /// Starts the stored bootstrapper with `args`.
    ///
    /// If it fails to start, the stored copy is assumed corrupt: it is
    /// deleted, downloaded again and started once more. A second failure is
    /// [`LauncherError::HandoffFailed`].
    pub async fn handoff(
        &self,
        spawner: &impl ProcessSpawner,
        integration: &impl OsIntegration,
        args: &[OsString],
    ) -> Result<()> {
        let path = self.bootstrapper_path();
        let spec = CommandSpec::detached(&path, args.to_vec());

        info!("Starting latest bootstrapper");
        let first_error = match spawner.spawn(&spec) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        debug!("Bootstrapper failed to start: {first_error:#}");
        info!("Found bootstrapper was corrupted! Downloading...");
        remove_path(&path)?;
        self.download_bootstrapper(integration).await?;

        spawner.spawn(&spec).map_err(|e| {
            LauncherError::HandoffFailed {
                path: path.display().to_string(),
                reason: format!("{e:#}"),
            }
            .into()
        })
    }

    async fn download_bootstrapper(&self, integration: &impl OsIntegration) -> Result<()> {
        let url = self.bootstrapper_url();
        let path = self.bootstrapper_path();
        // stage in the version directory so an interrupted download never
        // leaves a truncated file under the final name
        let staging = path.with_extension("download");

        if let Err(e) = self.transport.download(&url, &staging, self.limits).await {
            if let Err(cleanup) = remove_path(&staging) {
                warn!("Failed to remove {}: {cleanup:#}", staging.display());
            }
            return Err(e);
        }

        std::fs::rename(&staging, &path)
            .with_context(|| format!("Failed to move bootstrapper into {}", path.display()))?;
        integration.mark_executable(&path)?;
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
