//! Error handling for the launcher
//!
//! Two layers, as elsewhere in the crate:
//! - [`LauncherError`] - one variant per unrecoverable failure kind, returned
//!   inside `anyhow::Error` by every fallible operation
//! - [`ErrorContext`] - wrapper that adds a user-facing suggestion and
//!   details for display in the terminal
//!
//! Library code only decides *which* error occurred. Presentation (colors,
//! the pause before exit, the exit status) belongs to `main`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bubbaverse_launcher::core::{LauncherError, user_friendly_error};
//!
//! let error = LauncherError::Connectivity {
//!     attempted: 3,
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failure kinds surfaced by the launcher.
#[derive(Error, Debug, Clone)]
pub enum LauncherError {
    /// Every setup endpoint failed during version resolution.
    #[error("Could not reach any setup server ({attempted} endpoints tried)")]
    Connectivity {
        attempted: usize,
    },

    /// The server answered `/version` with nothing usable as a directory name.
    #[error("Setup server returned an unusable version token: {token:?}")]
    InvalidVersion {
        token: String,
    },

    #[error("Download failed: {url}")]
    Download {
        url: String,
        reason: String,
    },

    #[error("Not enough disk space in {path}: need {required} bytes, {available} available")]
    InsufficientDiskSpace {
        path: String,
        required: u64,
        available: u64,
    },

    #[error("Client archive is corrupt or unreadable: {path}")]
    Archive {
        path: String,
        reason: String,
    },

    /// The sentinel was present but the client executable was not.
    #[error("Client executable is missing: {path}")]
    MissingExecutable {
        path: String,
    },

    #[error("Unsupported launch mode: {launch_mode:?}")]
    InvalidLaunchRequest {
        launch_mode: String,
    },

    #[error("Failed to start the updated launcher: {path}")]
    HandoffFailed {
        path: String,
        reason: String,
    },

    #[error("Failed to start the game client: {program}")]
    LaunchFailed {
        program: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    #[error("File system error: {operation}")]
    FileSystemError {
        operation: String,
        path: String,
    },

    #[error("{message}")]
    Other {
        message: String,
    },
}

/// An error plus optional user-facing suggestion and details.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: LauncherError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: LauncherError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into an [`ErrorContext`] for terminal display.
///
/// A [`LauncherError`] anywhere in the chain gets a kind-specific suggestion.
/// Anything else is shown with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(launcher_error) = error.chain().find_map(|e| e.downcast_ref::<LauncherError>()) {
        let ctx = create_error_context(launcher_error.clone());
        return attach_outer_context(ctx, &error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(LauncherError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that your user owns the Bubbaverse install directory")
                .with_details(io_error.to_string());
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(LauncherError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(io_error.to_string());
            }
            _ => {}
        }
    }

    ErrorContext::new(LauncherError::Other {
        message: format_chain(&error),
    })
}

fn create_error_context(error: LauncherError) -> ErrorContext {
    let (suggestion, details): (Option<&str>, Option<String>) = match &error {
        LauncherError::Connectivity { .. } => (
            Some("Check your internet connection, then start the launcher again"),
            Some("The launcher asks the setup server for the latest version before anything else".to_string()),
        ),
        LauncherError::InvalidVersion { .. } => {
            (Some("The setup server may be under maintenance. Try again in a few minutes"), None)
        }
        LauncherError::Download { reason, .. } => (
            Some("Check your internet connection. Nothing was installed, so the next start retries from scratch"),
            Some(reason.clone()),
        ),
        LauncherError::InsufficientDiskSpace { .. } => {
            (Some("Free some disk space, or point --install-dir at a larger drive"), None)
        }
        LauncherError::Archive { reason, .. } => (
            Some("The download was probably cut short. Start the launcher again to redownload it"),
            Some(reason.clone()),
        ),
        LauncherError::MissingExecutable { .. } => (
            Some("Is your antivirus removing it? The client will be redownloaded on next launch"),
            Some("The install marker was cleared so the next run reinstalls the client".to_string()),
        ),
        LauncherError::InvalidLaunchRequest { .. } => (
            Some("Start the game from the website's Play button"),
            Some("Only the \"play\" launch mode is supported".to_string()),
        ),
        LauncherError::HandoffFailed { reason, .. } => (
            Some("Delete the Versions folder in the install directory and start the launcher again"),
            Some(reason.clone()),
        ),
        LauncherError::LaunchFailed { reason, .. } => {
            let suggestion = if cfg!(windows) {
                "Check that your antivirus is not blocking the client"
            } else {
                "Check that wine is installed, or put the full path of your wine binary in winepath.txt in the install directory"
            };
            (Some(suggestion), Some(reason.clone()))
        }
        LauncherError::ConfigError { .. } => (
            Some("Fix or remove launcher.toml in the install directory, or pass a different file with --config"),
            None,
        ),
        LauncherError::FileSystemError { path, .. } => {
            (Some("Check permissions on the install directory"), Some(format!("Path: {path}")))
        }
        LauncherError::Other { .. } => (None, None),
    };

    let mut ctx = ErrorContext::new(error);
    ctx.suggestion = suggestion.map(str::to_string);
    ctx.details = details;
    ctx
}

/// Context added around a typed error (for example which file was being
/// written) is kept as details when the kind itself has none.
fn attach_outer_context(ctx: ErrorContext, error: &anyhow::Error) -> ErrorContext {
    let outer: Vec<String> = error
        .chain()
        .take_while(|e| e.downcast_ref::<LauncherError>().is_none())
        .map(std::string::ToString::to_string)
        .collect();

    if outer.is_empty() || ctx.details.is_some() {
        return ctx;
    }
    ctx.with_details(outer.join(": "))
}

fn format_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}
