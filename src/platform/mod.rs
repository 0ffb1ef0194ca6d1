//! Operating-system integration.
//!
//! Everything that differs between Windows and the Unix-likes sits behind two
//! traits, chosen once at startup by [`detect`]:
//!
//! - [`OsIntegration`] registers the URI scheme, opens URLs, decides how the
//!   client is started, and marks downloaded binaries executable
//! - [`ProcessSpawner`] starts a prepared [`CommandSpec`]
//!
//! Tests substitute recording fakes for both.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

#[cfg(not(windows))]
pub mod unix;
#[cfg(windows)]
pub mod windows;

#[cfg(not(windows))]
pub use unix::UnixIntegration;
#[cfg(windows)]
pub use windows::WindowsIntegration;

/// The integration for the platform this binary was built for.
#[cfg(windows)]
pub type NativeIntegration = WindowsIntegration;
/// The integration for the platform this binary was built for.
#[cfg(not(windows))]
pub type NativeIntegration = UnixIntegration;

/// Selects the platform integration. Called once by the CLI.
pub fn detect() -> Result<NativeIntegration> {
    NativeIntegration::new()
}

/// A process to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Block until the process exits instead of detaching.
    pub wait: bool,
}

impl CommandSpec {
    pub fn detached(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            wait: false,
        }
    }

    pub fn waited(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            wait: true,
        }
    }
}

/// Starts processes.
pub trait ProcessSpawner {
    /// Starts `spec`. A process that starts and then exits non-zero is not an
    /// error; only failing to start is.
    fn spawn(&self, spec: &CommandSpec) -> Result<()>;
}

/// [`ProcessSpawner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, spec: &CommandSpec) -> Result<()> {
        debug!("Spawning {} {:?}", spec.program.display(), spec.args);
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);

        if spec.wait {
            let status = command
                .status()
                .with_context(|| format!("Failed to run {}", spec.program.display()))?;
            if !status.success() {
                warn!("{} exited with {status}", spec.program.display());
            }
        } else {
            command
                .spawn()
                .with_context(|| format!("Failed to start {}", spec.program.display()))?;
        }
        Ok(())
    }
}

/// Platform hooks used by the bootstrap sequence.
pub trait OsIntegration {
    /// Registers `scheme://` URIs to open `bootstrapper`.
    fn register_scheme(&self, scheme: &str, bootstrapper: &Path) -> Result<()>;

    /// Opens `url` in the user's browser.
    fn open_url(&self, url: &str) -> Result<()>;

    /// Builds the command that starts the client `executable` with `args`.
    ///
    /// `compat_config` names the optional file holding the compatibility
    /// layer binary; platforms that run the client natively ignore it.
    fn client_command(
        &self,
        executable: &Path,
        args: Vec<OsString>,
        compat_config: &Path,
        default_compat: &str,
    ) -> Result<CommandSpec>;

    /// Makes a downloaded binary runnable.
    fn mark_executable(&self, path: &Path) -> Result<()>;
}
