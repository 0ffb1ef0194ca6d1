//! Latest-version resolution with endpoint failover.
//!
//! The setup server publishes the current version token at `GET /version`.
//! Endpoints are tried strictly in order, one pass only, with an exponential
//! backoff between attempts. An endpoint fails when the request errors,
//! returns a non-success status, or returns a body with no usable token.
//!
//! The endpoint that answered is kept in the [`Resolution`]; every download in
//! the same run targets that origin.

use crate::config::LauncherConfig;
use crate::core::{LauncherError, Version};
use crate::net::Transport;
use crate::utils::backoff::exponential_backoff_with_delay;
use anyhow::Result;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A setup server origin such as `https://setup.boblox.org`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    origin: String,
}

impl Endpoint {
    /// Accepts `http://` and `https://` origins; a trailing `/` is dropped.
    pub fn parse(origin: &str) -> Result<Self, LauncherError> {
        let origin = origin.trim().trim_end_matches('/');
        if !(origin.starts_with("https://") || origin.starts_with("http://")) {
            return Err(LauncherError::ConfigError {
                message: format!("setup endpoint '{origin}' must start with http:// or https://"),
            });
        }
        Ok(Self {
            origin: origin.to_string(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn is_secure(&self) -> bool {
        self.origin.starts_with("https://")
    }

    /// `<origin>/<path>`
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.origin, path.trim_start_matches('/'))
    }

    /// Download URL for a versioned artifact: `<origin>/<raw>-<suffix>`.
    pub fn artifact_url(&self, version: &Version, suffix: &str) -> String {
        self.url_for(&format!("{}-{}", version.raw(), suffix))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

/// The resolved version and the endpoint that published it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub version: Version,
    pub endpoint: Endpoint,
}

pub struct VersionResolver<'a, T> {
    endpoints: Vec<Endpoint>,
    transport: &'a T,
    timeout: Duration,
    backoff_ms: u64,
}

impl<'a, T: Transport> VersionResolver<'a, T> {
    pub fn new(config: &LauncherConfig, transport: &'a T) -> Result<Self, LauncherError> {
        let endpoints = config
            .setup_endpoints
            .iter()
            .map(|e| Endpoint::parse(e))
            .collect::<Result<Vec<_>, _>>()?;
        if endpoints.is_empty() {
            return Err(LauncherError::ConfigError {
                message: "setup_endpoints must list at least one origin".to_string(),
            });
        }
        Ok(Self {
            endpoints,
            transport,
            timeout: config.version_timeout(),
            backoff_ms: config.endpoint_backoff_ms,
        })
    }

    /// Queries each endpoint in order until one returns a usable token.
    ///
    /// Fails with [`LauncherError::Connectivity`] after a single pass over
    /// all endpoints.
    pub async fn resolve(&self) -> Result<Resolution> {
        let mut attempt = 0;
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            if index > 0 {
                attempt = exponential_backoff_with_delay(attempt, self.backoff_ms).await;
            }

            let url = endpoint.url_for("version");
            debug!("Fetching latest client version from {url}");

            let body = match self.transport.get_text(&url, self.timeout).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Setup server {endpoint} unavailable: {e:#}");
                    continue;
                }
            };

            match Version::parse(&body) {
                Ok(version) => {
                    info!("Latest client version: {version}");
                    if endpoint.is_secure() {
                        debug!("Setup server: {endpoint}");
                    } else {
                        warn!("Downloads from {endpoint} are not encrypted");
                    }
                    return Ok(Resolution {
                        version,
                        endpoint: endpoint.clone(),
                    });
                }
                Err(e) => warn!("Setup server {endpoint} returned no usable version: {e}"),
            }
        }

        Err(LauncherError::Connectivity {
            attempted: self.endpoints.len(),
        }
        .into())
    }
}
