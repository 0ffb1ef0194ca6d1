//! Test doubles and fixtures shared by unit and integration tests.
//!
//! Available under `cfg(test)` and with the `test-utils` feature, which the
//! integration suite enables through the crate's dev-dependency on itself.
//!
//! - [`FakeTransport`] serves canned `/version` bodies and downloads and
//!   records every URL requested
//! - [`RecordingSpawner`] records spawned commands and can fail on demand
//! - [`RecordingIntegration`] records scheme registrations and opened URLs
//! - [`zip_bytes`] builds client archives in memory

use crate::config::LauncherConfig;
use crate::core::LauncherError;
use crate::net::{DownloadLimits, Transport};
use crate::platform::{CommandSpec, OsIntegration, ProcessSpawner};
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`. With neither, tests run
/// without a subscriber.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}

pub const TEST_ENDPOINTS: [&str; 3] =
    ["https://setup.test", "https://mirror.test", "http://setup.test"];

/// Config rooted at `root`, with test endpoints and no backoff delay.
pub fn test_config(root: &Path) -> LauncherConfig {
    LauncherConfig {
        setup_endpoints: TEST_ENDPOINTS.iter().map(|e| (*e).to_string()).collect(),
        install_root: Some(root.to_path_buf()),
        endpoint_backoff_ms: 0,
        ..LauncherConfig::default()
    }
}

/// Builds a zip archive in memory from `(name, content)` pairs. Names ending
/// in `/` become directories.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("add zip directory");
        } else {
            writer.start_file(*name, options).expect("start zip entry");
            writer.write_all(content).expect("write zip entry");
        }
    }
    writer.finish().expect("finish zip").into_inner()
}

/// A client archive holding the configured executable and some content.
pub fn client_archive(config: &LauncherConfig) -> Vec<u8> {
    zip_bytes(&[
        (config.client_executable.as_str(), b"MZ fake client"),
        ("content/", b""),
        ("content/fonts/arial.ttf", b"font"),
        ("content/sounds/ouch.ogg", b"sound"),
    ])
}

#[derive(Debug, Clone)]
enum TextResponse {
    Body(String),
    Fail(String),
}

/// In-memory [`Transport`].
///
/// URLs without a canned response fail. Every call is recorded in order,
/// whether or not it succeeds.
#[derive(Debug, Default)]
pub struct FakeTransport {
    texts: Mutex<HashMap<String, TextResponse>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.set_text(url, body);
        self
    }

    #[must_use]
    pub fn with_failure(self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        lock(&self.texts).insert(url.into(), TextResponse::Fail(reason.into()));
        self
    }

    #[must_use]
    pub fn with_file(self, url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.set_file(url, content);
        self
    }

    pub fn set_text(&self, url: impl Into<String>, body: impl Into<String>) {
        lock(&self.texts).insert(url.into(), TextResponse::Body(body.into()));
    }

    pub fn set_file(&self, url: impl Into<String>, content: impl Into<Vec<u8>>) {
        lock(&self.files).insert(url.into(), content.into());
    }

    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    fn record(&self, url: &str) {
        lock(&self.requests).push(url.to_string());
    }
}

impl Transport for FakeTransport {
    async fn get_text(&self, url: &str, _timeout: Duration) -> Result<String> {
        self.record(url);
        match lock(&self.texts).get(url).cloned() {
            Some(TextResponse::Body(body)) => Ok(body),
            Some(TextResponse::Fail(reason)) => Err(anyhow!("{reason}")),
            None => Err(anyhow!("no route to {url}")),
        }
    }

    async fn download(&self, url: &str, dest: &Path, limits: DownloadLimits) -> Result<u64> {
        self.record(url);
        let content = lock(&self.files).get(url).cloned().ok_or_else(|| LauncherError::Download {
            url: url.to_string(),
            reason: "HTTP 404 Not Found".to_string(),
        })?;
        if content.len() as u64 > limits.max_bytes {
            return Err(LauncherError::Download {
                url: url.to_string(),
                reason: format!("body exceeded the {} byte limit", limits.max_bytes),
            }
            .into());
        }
        std::fs::write(dest, &content)?;
        Ok(content.len() as u64)
    }
}

/// [`ProcessSpawner`] that records commands instead of running them.
#[derive(Debug, Default)]
pub struct RecordingSpawner {
    spawned: Mutex<Vec<CommandSpec>>,
    failures_remaining: Mutex<usize>,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `count` spawns fail (and are still recorded).
    pub fn failing(count: usize) -> Self {
        Self {
            spawned: Mutex::default(),
            failures_remaining: Mutex::new(count),
        }
    }

    pub fn spawned(&self) -> Vec<CommandSpec> {
        lock(&self.spawned).clone()
    }

    pub fn spawn_count(&self) -> usize {
        lock(&self.spawned).len()
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, spec: &CommandSpec) -> Result<()> {
        lock(&self.spawned).push(spec.clone());
        let mut remaining = lock(&self.failures_remaining);
        if *remaining > 0 {
            *remaining -= 1;
            return Err(anyhow!("simulated spawn failure for {}", spec.program.display()));
        }
        Ok(())
    }
}

/// [`OsIntegration`] that records calls and launches the client natively.
#[derive(Debug, Default)]
pub struct RecordingIntegration {
    registered: Mutex<Vec<(String, PathBuf)>>,
    opened: Mutex<Vec<String>>,
    marked_executable: Mutex<Vec<PathBuf>>,
    fail_registration: bool,
}

impl RecordingIntegration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheme registration always fails.
    pub fn failing_registration() -> Self {
        Self {
            fail_registration: true,
            ..Self::default()
        }
    }

    pub fn registered(&self) -> Vec<(String, PathBuf)> {
        lock(&self.registered).clone()
    }

    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).clone()
    }

    pub fn marked_executable(&self) -> Vec<PathBuf> {
        lock(&self.marked_executable).clone()
    }
}

impl OsIntegration for RecordingIntegration {
    fn register_scheme(&self, scheme: &str, bootstrapper: &Path) -> Result<()> {
        lock(&self.registered).push((scheme.to_string(), bootstrapper.to_path_buf()));
        if self.fail_registration {
            return Err(anyhow!("registry is read-only"));
        }
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        lock(&self.opened).push(url.to_string());
        Ok(())
    }

    fn client_command(
        &self,
        executable: &Path,
        args: Vec<OsString>,
        _compat_config: &Path,
        _default_compat: &str,
    ) -> Result<CommandSpec> {
        Ok(CommandSpec::detached(executable, args))
    }

    fn mark_executable(&self, path: &Path) -> Result<()> {
        lock(&self.marked_executable).push(path.to_path_buf());
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
