//! One launcher run, start to finish.
//!
//! ```text
//! resolve version -> create layout -> self-update gate
//!     Handoff   -> start stored bootstrapper, done
//!     UpToDate  -> no activation: open website, done
//!                  activation:    install if needed, launch client, done
//! ```
//!
//! Every collaborator that touches the network, processes or the OS is a
//! type parameter, so the whole flow runs against fakes in tests.

use crate::config::LauncherConfig;
use crate::core::LauncherError;
use crate::installer::PayloadInstaller;
use crate::launch::{GameLauncher, parse_activation};
use crate::net::{DownloadLimits, Transport};
use crate::platform::{OsIntegration, ProcessSpawner};
use crate::resolver::VersionResolver;
use crate::store::InstallationStore;
use crate::upgrade::{GateState, SelfUpdateGate};
use anyhow::Result;
use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, info};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No activation argument; the website was opened instead.
    WebsiteOpened,
    /// The published bootstrapper was started in our place.
    HandedOff,
    /// The client was started.
    Launched,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        0
    }
}

pub struct Bootstrapper<T, S, O> {
    config: LauncherConfig,
    store: InstallationStore,
    transport: T,
    spawner: S,
    integration: O,
}

impl<T: Transport, S: ProcessSpawner, O: OsIntegration> Bootstrapper<T, S, O> {
    pub fn new(config: LauncherConfig, transport: T, spawner: S, integration: O) -> Result<Self> {
        let store = InstallationStore::new(config.install_root()?, &config);
        Ok(Self {
            config,
            store,
            transport,
            spawner,
            integration,
        })
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn store(&self) -> &InstallationStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn integration(&self) -> &O {
        &self.integration
    }

    /// Runs the launcher.
    ///
    /// `current_exe` is the running binary, compared against the published
    /// bootstrapper. `activation` is the `bubba-player://` argument, if any.
    /// `forward_args` are passed unchanged to the bootstrapper on handoff.
    pub async fn run(
        &self,
        current_exe: &Path,
        activation: Option<&str>,
        forward_args: &[OsString],
    ) -> Result<Outcome> {
        let resolution = VersionResolver::new(&self.config, &self.transport)?.resolve().await?;
        let version = &resolution.version;

        let version_dir = self.store.ensure_layout(version)?;
        debug!("Version directory: {}", version_dir.display());

        let gate = SelfUpdateGate::new(
            &self.store,
            &self.transport,
            &resolution,
            &self.config.bootstrapper_filename,
            DownloadLimits::from_config(&self.config),
        );
        gate.ensure_bootstrapper(&self.integration).await?;

        match gate.evaluate(current_exe).await? {
            GateState::Handoff => {
                gate.handoff(&self.spawner, &self.integration, forward_args).await?;
                return Ok(Outcome::HandedOff);
            }
            GateState::UpToDate => debug!("Launcher is up to date"),
            GateState::NeedBootstrapper => {
                return Err(missing_bootstrapper(&gate.bootstrapper_path()).into());
            }
        }

        let Some(request) = parse_activation(activation, &self.config.url_scheme) else {
            let url = self.config.website_url();
            info!("No launch request, opening {url}");
            self.integration.open_url(&url)?;
            return Ok(Outcome::WebsiteOpened);
        };

        PayloadInstaller::new(
            &self.config,
            &self.store,
            &self.transport,
            &self.integration,
            &resolution,
        )
        .install()
        .await?;

        GameLauncher::new(&self.config, &self.store, &self.integration, &self.spawner)
            .launch(version, &request)?;
        Ok(Outcome::Launched)
    }
}

/// The gate found no stored bootstrapper right after ensuring one exists.
fn missing_bootstrapper(path: &Path) -> LauncherError {
    LauncherError::HandoffFailed {
        path: path.display().to_string(),
        reason: "the downloaded bootstrapper disappeared before it could be started".to_string(),
    }
}
