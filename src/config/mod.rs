//! Launcher configuration.
//!
//! Every hostname, filename, timeout and resource limit the launcher uses
//! lives in one immutable [`LauncherConfig`], built once at startup and
//! borrowed by every stage. Defaults reproduce the published launcher; an
//! optional TOML file can override any subset of fields.
//!
//! # Lookup order
//!
//! 1. `--config <PATH>` (or `BUBBA_CONFIG_PATH`), which must exist
//! 2. `<install root>/launcher.toml`, if present
//! 3. built-in defaults
//!
//! `--install-dir` (or `BUBBA_INSTALL_DIR`) overrides `install_root` from
//! any source.
//!
//! # Example
//!
//! ```toml
//! setup_endpoints = ["https://mirror.example.org"]
//! endpoint_backoff_ms = 0
//! ```

use crate::constants::{
    CLIENT_ARCHIVE_SUFFIX, CLIENT_DIR_NAME, CLIENT_EXECUTABLE, COMPAT_CONFIG_NAME,
    CONFIG_FILE_NAME, CONNECT_TIMEOUT, READ_TIMEOUT, DEFAULT_BASE_HOST, DEFAULT_COMPAT_COMMAND, DEFAULT_SETUP_HOST,
    DISK_HEADROOM_BYTES, INSTALL_DIR_NAME, MAX_DOWNLOAD_BYTES, SENTINEL_NAME,
    STARTING_BACKOFF_DELAY_MS, UNIX_BOOTSTRAPPER, URL_SCHEME, VERSION_TIMEOUT,
    WINDOWS_BOOTSTRAPPER,
};
use crate::core::LauncherError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Public web host (games page, authentication, sentinel `BaseUrl`).
    pub base_host: String,

    /// Setup server origins, tried in order. Repeating an origin retries it
    /// after the backoff delay.
    pub setup_endpoints: Vec<String>,

    pub url_scheme: String,
    pub bootstrapper_filename: String,
    pub client_archive_suffix: String,
    pub client_dir_name: String,
    pub client_executable: String,
    pub sentinel_name: String,
    pub compat_config_name: String,
    pub default_compat_command: String,

    /// `None` means the platform default from [`default_install_root`].
    pub install_root: Option<PathBuf>,

    pub version_timeout_secs: u64,
    /// Applies to every request, downloads included.
    pub connect_timeout_secs: u64,
    /// A download that stalls for this long is abandoned.
    pub read_timeout_secs: u64,
    pub max_download_bytes: u64,
    pub disk_headroom_bytes: u64,
    pub endpoint_backoff_ms: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            base_host: DEFAULT_BASE_HOST.to_string(),
            setup_endpoints: vec![
                format!("https://{DEFAULT_SETUP_HOST}"),
                format!("https://{DEFAULT_SETUP_HOST}"),
                format!("http://{DEFAULT_SETUP_HOST}"),
            ],
            url_scheme: URL_SCHEME.to_string(),
            bootstrapper_filename: default_bootstrapper_filename().to_string(),
            client_archive_suffix: CLIENT_ARCHIVE_SUFFIX.to_string(),
            client_dir_name: CLIENT_DIR_NAME.to_string(),
            client_executable: CLIENT_EXECUTABLE.to_string(),
            sentinel_name: SENTINEL_NAME.to_string(),
            compat_config_name: COMPAT_CONFIG_NAME.to_string(),
            default_compat_command: DEFAULT_COMPAT_COMMAND.to_string(),
            install_root: None,
            version_timeout_secs: VERSION_TIMEOUT.as_secs(),
            connect_timeout_secs: CONNECT_TIMEOUT.as_secs(),
            read_timeout_secs: READ_TIMEOUT.as_secs(),
            max_download_bytes: MAX_DOWNLOAD_BYTES,
            disk_headroom_bytes: DISK_HEADROOM_BYTES,
            endpoint_backoff_ms: STARTING_BACKOFF_DELAY_MS,
        }
    }
}

impl LauncherConfig {
    /// Builds the run's configuration from the optional explicit file and
    /// install directory override. See the module docs for lookup order.
    pub async fn resolve(explicit: Option<&Path>, install_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path).await?,
            None => {
                let root = match &install_dir {
                    Some(dir) => dir.clone(),
                    None => default_install_root()?,
                };
                let candidate = root.join(CONFIG_FILE_NAME);
                if candidate.exists() {
                    Self::load_from(&candidate).await?
                } else {
                    debug!("No config file at {}, using defaults", candidate.display());
                    Self::default()
                }
            }
        };

        if install_dir.is_some() {
            config.install_root = install_dir;
        }

        config.validate()?;
        Ok(config)
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read launcher config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| LauncherError::ConfigError {
            message: format!("{}: {}", path.display(), e.message()),
        })?;
        debug!("Loaded launcher config from {}", path.display());
        Ok(config)
    }

    /// Rejects configurations the launcher cannot run with.
    pub fn validate(&self) -> Result<(), LauncherError> {
        if self.setup_endpoints.is_empty() {
            return Err(LauncherError::ConfigError {
                message: "setup_endpoints must list at least one origin".to_string(),
            });
        }
        if let Some(bad) = self
            .setup_endpoints
            .iter()
            .find(|e| !(e.starts_with("https://") || e.starts_with("http://")))
        {
            return Err(LauncherError::ConfigError {
                message: format!("setup endpoint '{bad}' must start with http:// or https://"),
            });
        }

        let names = [
            ("url_scheme", &self.url_scheme),
            ("base_host", &self.base_host),
            ("bootstrapper_filename", &self.bootstrapper_filename),
            ("client_dir_name", &self.client_dir_name),
            ("client_executable", &self.client_executable),
            ("sentinel_name", &self.sentinel_name),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(LauncherError::ConfigError {
                    message: format!("{field} must not be empty"),
                });
            }
        }
        Ok(())
    }

    pub fn install_root(&self) -> Result<PathBuf> {
        match &self.install_root {
            Some(root) => Ok(root.clone()),
            None => default_install_root(),
        }
    }

    pub fn version_timeout(&self) -> Duration {
        Duration::from_secs(self.version_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Page opened when the launcher runs without an activation URI.
    pub fn website_url(&self) -> String {
        format!("https://{}/games", self.base_host)
    }

    /// Authentication endpoint handed to the client.
    pub fn authentication_url(&self) -> String {
        format!("https://{}/Login/Negotiate.ashx", self.base_host)
    }
}

/// Platform-specific bootstrapper file name published by the setup server.
pub const fn default_bootstrapper_filename() -> &'static str {
    if cfg!(windows) {
        WINDOWS_BOOTSTRAPPER
    } else {
        UNIX_BOOTSTRAPPER
    }
}

/// `%LOCALAPPDATA%\Bubbaverse` on Windows, `~/.local/share/Bubbaverse` on
/// Linux, and the platform's local data directory elsewhere.
pub fn default_install_root() -> Result<PathBuf> {
    let base = dirs::data_local_dir().ok_or_else(|| LauncherError::ConfigError {
        message: "Could not determine the local data directory; pass --install-dir".to_string(),
    })?;
    Ok(base.join(INSTALL_DIR_NAME))
}
