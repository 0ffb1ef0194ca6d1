//! HTTP transport for the setup server.
//!
//! The launcher talks to the network through the [`Transport`] trait so every
//! stage can be exercised against an in-memory fake. [`HttpTransport`] is the
//! production implementation on top of `reqwest`.
//!
//! Downloads stream straight to disk and are guarded twice against runaway
//! responses. A declared `Content-Length` above the limit is refused before
//! any byte is written. The running byte count is also checked while
//! streaming, which catches servers that lie about or omit the length.

use crate::config::LauncherConfig;
use crate::constants::USER_AGENT;
use crate::core::LauncherError;
use crate::utils::progress::ProgressBar;
use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Resource guards applied to a single download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadLimits {
    /// Largest accepted body, in bytes.
    pub max_bytes: u64,
    /// Free space required on the destination filesystem on top of the
    /// expected body size.
    pub headroom_bytes: u64,
}

impl DownloadLimits {
    pub fn from_config(config: &LauncherConfig) -> Self {
        Self {
            max_bytes: config.max_download_bytes,
            headroom_bytes: config.disk_headroom_bytes,
        }
    }
}

/// Network operations the launcher needs.
///
/// Both operations report failures as `anyhow::Error`. [`download`] failures
/// carry a [`LauncherError`] so callers and the CLI can tell them apart.
///
/// [`download`]: Transport::download
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// `GET url` and return the body as text. Non-success statuses are errors.
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String>;

    /// Streams `url` into `dest`, returning the number of bytes written.
    /// On failure `dest` may hold a partial file; callers clean it up.
    async fn download(&self, url: &str, dest: &Path, limits: DownloadLimits) -> Result<u64>;
}

/// `reqwest`-backed [`Transport`].
pub struct HttpTransport {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpTransport {
    /// Builds a client with the configured connect and read timeouts, so a
    /// stalled server cannot hang the launcher.
    pub fn new(config: &LauncherConfig, show_progress: bool) -> Result<Self> {
        Self::from_builder(Self::client_builder(config), show_progress)
    }

    fn client_builder(config: &LauncherConfig) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
    }

    fn from_builder(builder: reqwest::ClientBuilder, show_progress: bool) -> Result<Self> {
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            show_progress,
        })
    }
}

impl Transport for HttpTransport {
    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Request to {url} was rejected"))?;

        response.text().await.with_context(|| format!("Failed to read response body from {url}"))
    }

    async fn download(&self, url: &str, dest: &Path, limits: DownloadLimits) -> Result<u64> {
        info!("Downloading {url}");
        let download_error = |reason: String| LauncherError::Download {
            url: url.to_string(),
            reason,
        };

        let response =
            self.client.get(url).send().await.map_err(|e| download_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())).into());
        }

        let expected = response.content_length();
        if let Some(len) = expected.filter(|len| *len > limits.max_bytes) {
            return Err(download_error(format!(
                "server announced {len} bytes, limit is {}",
                limits.max_bytes
            ))
            .into());
        }

        if let Some(parent) = dest.parent() {
            check_disk_headroom(parent, expected.unwrap_or(0), limits.headroom_bytes)?;
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;

        let progress = ProgressBar::download(expected, self.show_progress);
        if let Some(name) = url.rsplit('/').next() {
            progress.set_prefix(name.to_string());
        }

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_error(e.to_string()))?;
            written += chunk.len() as u64;
            if written > limits.max_bytes {
                progress.finish_and_clear();
                return Err(download_error(format!(
                    "body exceeded the {} byte limit",
                    limits.max_bytes
                ))
                .into());
            }
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            progress.inc(chunk.len() as u64);
        }
        file.flush().await.with_context(|| format!("Failed to flush {}", dest.display()))?;
        progress.finish_and_clear();

        debug!("Downloaded {written} bytes to {}", dest.display());
        Ok(written)
    }
}

/// Fails with [`LauncherError::InsufficientDiskSpace`] when `dir`'s filesystem
/// has less than `expected + headroom` bytes free.
///
/// A filesystem that cannot report free space is not treated as full.
pub fn check_disk_headroom(dir: &Path, expected: u64, headroom: u64) -> Result<()> {
    let required = expected.saturating_add(headroom);
    match fs4::available_space(dir) {
        Ok(available) if available < required => Err(LauncherError::InsufficientDiskSpace {
            path: dir.display().to_string(),
            required,
            available,
        }
        .into()),
        Ok(_) => Ok(()),
        Err(e) => {
            debug!("Could not query free space for {}: {e}", dir.display());
            Ok(())
        }
    }
}
