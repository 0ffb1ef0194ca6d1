//! Fixed names, hosts and numeric defaults used across the launcher.
//!
//! Most of these only seed [`LauncherConfig`](crate::config::LauncherConfig)
//! defaults. Code that needs one of these values at runtime should read it
//! from the config so a `launcher.toml` override is honored.

use std::time::Duration;

/// Public web host. Used for the fallback games page, the authentication
/// endpoint handed to the client, and the `BaseUrl` written into the
/// completion sentinel.
pub const DEFAULT_BASE_HOST: &str = "www.boblox.org";

/// Host serving `/version`, bootstrapper binaries and client archives.
pub const DEFAULT_SETUP_HOST: &str = "setup.boblox.org";

/// URI scheme the launcher registers itself for.
pub const URL_SCHEME: &str = "bubba-player";

/// Published bootstrapper name on Windows.
pub const WINDOWS_BOOTSTRAPPER: &str = "BubbaversePlayerLauncher.exe";

/// Published bootstrapper name everywhere else.
pub const UNIX_BOOTSTRAPPER: &str = "BubbaversePlayerLinuxLauncher";

pub const CLIENT_ARCHIVE_SUFFIX: &str = "2021client.zip";
pub const CLIENT_DIR_NAME: &str = "Client2021";
pub const CLIENT_EXECUTABLE: &str = "BubbaversePlayerBeta.exe";

/// Completion sentinel. Its presence is the only marker of a finished install.
pub const SENTINEL_NAME: &str = "AppSettings.xml";

/// One-line file under the install root naming the compatibility layer binary.
pub const COMPAT_CONFIG_NAME: &str = "winepath.txt";
pub const DEFAULT_COMPAT_COMMAND: &str = "wine";

/// Optional TOML override file looked up under the install root.
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

/// Directory created under the platform's local data dir.
pub const INSTALL_DIR_NAME: &str = "Bubbaverse";
pub const VERSIONS_DIR: &str = "Versions";
pub const DOWNLOADS_DIR: &str = "Downloads";

pub const USER_AGENT: &str = "Bubbaverse Launcher";

/// Per-endpoint timeout for the `/version` query.
pub const VERSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed to establish any connection to the setup server.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest silence tolerated between reads of a response body.
pub const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on any single download (2 GiB).
pub const MAX_DOWNLOAD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Free space required on top of the expected download size (64 MiB).
pub const DISK_HEADROOM_BYTES: u64 = 64 * 1024 * 1024;

/// Starting delay between endpoint attempts. Doubles per attempt.
pub const STARTING_BACKOFF_DELAY_MS: u64 = 250;

/// Exponential backoff delays are capped at this value.
pub const MAX_BACKOFF_DELAY_MS: u64 = 2_000;

/// How long `main` keeps an error on screen before exiting.
pub const DEFAULT_ERROR_PAUSE_SECS: u64 = 10;
