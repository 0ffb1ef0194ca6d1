//! Activation decoding and client launch.
//!
//! - [`args`] turns the `bubba-player://` argument into a [`LaunchRequest`]
//! - [`launcher`] validates the request and starts the installed client

pub mod args;
pub mod launcher;

pub use args::{LaunchRequest, parse_activation};
pub use launcher::GameLauncher;
