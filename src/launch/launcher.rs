use super::LaunchRequest;
use crate::config::LauncherConfig;
use crate::core::{LauncherError, Version};
use crate::platform::{OsIntegration, ProcessSpawner};
use crate::store::InstallationStore;
use crate::utils::fs::remove_path;
use anyhow::Result;
use std::ffi::OsString;
use tracing::{info, warn};

/// Starts the installed client for a decoded [`LaunchRequest`].
pub struct GameLauncher<'a, O, S> {
    config: &'a LauncherConfig,
    store: &'a InstallationStore,
    integration: &'a O,
    spawner: &'a S,
}

impl<'a, O: OsIntegration, S: ProcessSpawner> GameLauncher<'a, O, S> {
    pub fn new(
        config: &'a LauncherConfig,
        store: &'a InstallationStore,
        integration: &'a O,
        spawner: &'a S,
    ) -> Self {
        Self {
            config,
            store,
            integration,
            spawner,
        }
    }

    /// Client arguments, in the order the client expects them.
    pub fn client_args(&self, request: &LaunchRequest) -> Vec<OsString> {
        vec![
            "--play".into(),
            "--authenticationUrl".into(),
            self.config.authentication_url().into(),
            "--authenticationTicket".into(),
            request.auth_ticket.clone().into(),
            "--joinScriptUrl".into(),
            request.join_script.clone().into(),
        ]
    }

    /// Launches the client for `version`.
    ///
    /// If the executable has gone missing since install, the sentinel is
    /// deleted so the next run reinstalls; this run fails.
    pub fn launch(&self, version: &Version, request: &LaunchRequest) -> Result<()> {
        if !request.is_play() {
            return Err(LauncherError::InvalidLaunchRequest {
                launch_mode: request.launch_mode.clone(),
            }
            .into());
        }

        let executable = self.store.client_executable_path(version);
        if !executable.is_file() {
            self.invalidate_install(version);
            return Err(LauncherError::MissingExecutable {
                path: executable.display().to_string(),
            }
            .into());
        }

        let spec = self.integration.client_command(
            &executable,
            self.client_args(request),
            &self.store.compat_config_path(),
            &self.config.default_compat_command,
        )?;

        info!("Launching Bubbaverse Player");
        self.spawner.spawn(&spec).map_err(|e| LauncherError::LaunchFailed {
            program: spec.program.display().to_string(),
            reason: format!("{e:#}"),
        })?;
        Ok(())
    }

    fn invalidate_install(&self, version: &Version) {
        let sentinel = self.store.sentinel_path(version);
        if let Err(e) = remove_path(&sentinel) {
            warn!("Failed to remove {}: {e:#}", sentinel.display());
        }
    }
}
