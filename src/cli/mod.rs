//! Command-line interface for the Bubbaverse launcher.
//!
//! The launcher has no subcommands. Its one positional argument is the
//! `bubba-player://` activation URI the browser passes when a game is
//! joined; run without it, the launcher updates itself and opens the games
//! page.
//!
//! # Examples
//!
//! ```bash
//! bubbaverse-launcher                                   # update, open website
//! bubbaverse-launcher "bubba-player://launchmode:play+gameinfo:T+placelauncherurl:U"
//! bubbaverse-launcher --verbose --no-pause              # debug logs, exit at once
//! BUBBA_INSTALL_DIR=/tmp/bubba bubbaverse-launcher      # alternate install root
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: overrides the log filter chosen by `--verbose`/`--quiet`
//! - `BUBBA_CONFIG_PATH`: same as `--config`
//! - `BUBBA_INSTALL_DIR`: same as `--install-dir`
//! - `BUBBA_NO_PROGRESS`: same as `--no-progress`
//! - `BUBBA_ERROR_PAUSE_SECS`: same as `--error-pause`

use crate::bootstrap::{Bootstrapper, Outcome};
use crate::config::LauncherConfig;
use crate::constants::DEFAULT_ERROR_PAUSE_SECS;
use crate::net::HttpTransport;
use crate::platform::{self, SystemSpawner};
use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::FalseyValueParser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Settings derived from the command line that shape the run itself rather
/// than what the launcher does.
///
/// Kept separate from [`Cli`] so tests can build one directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,

    /// Disables the download progress bar.
    pub no_progress: bool,

    /// Explicit launcher config file.
    pub config_path: Option<PathBuf>,

    /// Overrides the installation root.
    pub install_dir: Option<PathBuf>,

    /// How long to keep an error on screen before exiting. `None` exits at
    /// once.
    pub error_pause: Option<Duration>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over [`log_level`](Self::log_level). With
    /// neither, only errors are shown. Calling this twice is harmless.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("error"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "bubbaverse-launcher",
    about = "Bubbaverse Player launcher - installs, updates and starts the client",
    version,
    long_about = "Keeps the Bubbaverse Player launcher and client up to date and starts the client \
                  from bubba-player:// links. Run without arguments to update and open the games page."
)]
pub struct Cli {
    /// The `bubba-player://` activation URI passed by the browser.
    activation: Option<String>,

    /// Show debug output, including each setup server tried.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long)]
    quiet: bool,

    /// Path to a launcher config file (TOML).
    ///
    /// Without it, `<install dir>/launcher.toml` is used if present.
    #[arg(short, long, env = "BUBBA_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Install into this directory instead of the per-user data directory.
    #[arg(long, env = "BUBBA_INSTALL_DIR")]
    install_dir: Option<PathBuf>,

    /// Disable the download progress bar.
    #[arg(long, env = "BUBBA_NO_PROGRESS", value_parser = FalseyValueParser::new())]
    no_progress: bool,

    /// Exit immediately on error instead of pausing. Wins over
    /// `--error-pause`.
    #[arg(long)]
    no_pause: bool,

    /// Seconds to keep an error message on screen before exiting.
    #[arg(long, value_name = "SECS", env = "BUBBA_ERROR_PAUSE_SECS", default_value_t = DEFAULT_ERROR_PAUSE_SECS)]
    error_pause: u64,
}

impl Cli {
    /// Runs the launcher with settings from this command line.
    pub async fn execute(self) -> Result<Outcome> {
        let config = self.build_config();
        self.execute_with_config(&config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        let error_pause = (!self.no_pause && self.error_pause > 0)
            .then(|| Duration::from_secs(self.error_pause));

        CliConfig {
            log_level: Some(log_level.to_string()),
            no_progress: self.no_progress,
            config_path: self.config.clone(),
            install_dir: self.install_dir.clone(),
            error_pause,
        }
    }

    pub fn activation(&self) -> Option<&str> {
        self.activation.as_deref()
    }

    /// Runs the launcher against the real network, processes and OS.
    ///
    /// On handoff the published bootstrapper receives this process's
    /// arguments unchanged.
    pub async fn execute_with_config(self, config: &CliConfig) -> Result<Outcome> {
        let launcher_config =
            LauncherConfig::resolve(config.config_path.as_deref(), config.install_dir.clone())
                .await?;

        let transport = HttpTransport::new(&launcher_config, !config.no_progress)?;
        let integration = platform::detect()?;
        let bootstrapper =
            Bootstrapper::new(launcher_config, transport, SystemSpawner, integration)?;

        let current_exe =
            std::env::current_exe().context("Failed to locate the running launcher")?;
        let forward_args: Vec<OsString> = std::env::args_os().skip(1).collect();

        bootstrapper.run(&current_exe, self.activation(), &forward_args).await
    }
}
