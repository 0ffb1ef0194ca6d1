//! Bubbaverse launcher - installer, self-updater and launcher for the
//! Bubbaverse Player client.
//!
//! The launcher is what the browser starts for `bubba-player://` links. Each
//! run it asks the setup servers for the current client version, makes sure
//! it is itself the bootstrapper published for that version, installs the
//! client if needed and starts it.
//!
//! # Architecture Overview
//!
//! ```text
//! VersionResolver -> InstallationStore -> SelfUpdateGate -> PayloadInstaller
//!                                                        -> parse_activation -> GameLauncher
//! ```
//!
//! - The version token comes from the first setup server that answers.
//!   Downloads go to that same server.
//! - Install state lives on disk under a per-version directory. A version is
//!   installed exactly when its `AppSettings.xml` sentinel exists.
//! - The running binary is compared byte for byte (by SHA-256) with the
//!   published bootstrapper. Any difference hands off to the published one.
//! - OS specifics (URI scheme registration, opening URLs, running the client
//!   natively or through Wine) sit behind [`platform::OsIntegration`], chosen
//!   once at startup.
//!
//! # Modules
//!
//! - [`bootstrap`] - one run of the launcher, start to finish
//! - [`cli`] - command-line parsing and logging setup
//! - [`config`] - the immutable [`config::LauncherConfig`]
//! - [`constants`] - published hostnames, filenames and limits
//! - [`core`] - error types and the version token
//! - [`installer`] - payload download, validation and extraction
//! - [`launch`] - activation URI decoding and client launch
//! - [`net`] - HTTP transport with size and disk guards
//! - [`platform`] - per-OS integration and process spawning
//! - [`resolver`] - version lookup with endpoint failover
//! - [`store`] - the on-disk layout
//! - [`upgrade`] - the self-update gate
//! - [`utils`] - filesystem helpers, backoff and progress bars
//!
//! # On-disk Layout
//!
//! ```text
//! <install root>/
//! ├── launcher.toml            optional config overrides
//! ├── winepath.txt             optional compatibility command (non-Windows)
//! ├── Downloads/               temporary, removed after install
//! └── Versions/
//!     └── <sanitized version>/
//!         ├── BubbaversePlayerLauncher.exe
//!         ├── AppSettings.xml  completion sentinel
//!         └── Client2021/      extracted payload
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod installer;
pub mod launch;
pub mod net;
pub mod platform;
pub mod resolver;
pub mod store;
pub mod upgrade;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
