//! Common test utilities for launcher integration tests
//!
//! [`TestSite`] stands in for the setup servers: it publishes a version
//! token, a bootstrapper and a client archive on a [`FakeTransport`], and
//! builds a [`Bootstrapper`] rooted in a temporary install directory.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use assert_cmd::Command;
use bubbaverse_launcher::bootstrap::Bootstrapper;
use bubbaverse_launcher::config::LauncherConfig;
use bubbaverse_launcher::core::Version;
use bubbaverse_launcher::store::InstallationStore;
use bubbaverse_launcher::test_utils::{
    FakeTransport, RecordingIntegration, RecordingSpawner, TEST_ENDPOINTS, client_archive,
    init_test_logging, test_config,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub type TestBootstrapper = Bootstrapper<FakeTransport, RecordingSpawner, RecordingIntegration>;

pub const BOOTSTRAPPER_BYTES: &[u8] = b"published bootstrapper build";

pub struct TestSite {
    pub temp: TempDir,
    pub config: LauncherConfig,
    pub transport: FakeTransport,
}

impl TestSite {
    pub fn new() -> Self {
        init_test_logging(None);
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp.path().join("install"));
        Self {
            temp,
            config,
            transport: FakeTransport::new(),
        }
    }

    /// Publishes `token` with its bootstrapper and client archive on
    /// `endpoint`.
    #[must_use]
    pub fn publish(self, endpoint: &str, token: &str) -> Self {
        self.transport.set_text(format!("{endpoint}/version"), token);
        self.transport.set_file(
            format!("{endpoint}/{token}-{}", self.config.bootstrapper_filename),
            BOOTSTRAPPER_BYTES,
        );
        self.transport.set_file(
            format!("{endpoint}/{token}-{}", self.config.client_archive_suffix),
            client_archive(&self.config),
        );
        self
    }

    pub fn publish_on_primary(self, token: &str) -> Self {
        self.publish(TEST_ENDPOINTS[0], token)
    }

    pub fn install_root(&self) -> PathBuf {
        self.temp.path().join("install")
    }

    pub fn store(&self) -> InstallationStore {
        InstallationStore::new(self.install_root(), &self.config)
    }

    /// Writes a "running launcher" with `content` outside the install root.
    pub fn running_exe(&self, content: &[u8]) -> PathBuf {
        let path = self.temp.path().join("launcher-from-website");
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn bootstrapper(self, spawner: RecordingSpawner) -> (TestBootstrapper, TempDir) {
        let bootstrapper =
            Bootstrapper::new(self.config, self.transport, spawner, RecordingIntegration::new())
                .unwrap();
        (bootstrapper, self.temp)
    }
}

pub fn version(token: &str) -> Version {
    Version::parse(token).unwrap()
}

/// The launcher binary, pointed at `install_dir`, exiting at once on error.
pub fn launcher_cmd(install_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bubbaverse-launcher").unwrap();
    cmd.arg("--no-pause")
        .arg("--no-progress")
        .arg("--install-dir")
        .arg(install_dir)
        .env_remove("BUBBA_CONFIG_PATH")
        .env_remove("BUBBA_ERROR_PAUSE_SECS")
        .env_remove("BUBBA_NO_PROGRESS");
    cmd
}
