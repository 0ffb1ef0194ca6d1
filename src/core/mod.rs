//! Core types shared by every launcher stage.
//!
//! - [`LauncherError`] and [`ErrorContext`] for error kinds and their display
//! - [`Version`] for the server's version token and its filesystem-safe form

pub mod error;
pub mod version;

pub use error::{ErrorContext, LauncherError, user_friendly_error};
pub use version::Version;
