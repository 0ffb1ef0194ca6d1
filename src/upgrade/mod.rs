//! Self-update of the launcher binary.
//!
//! The setup server publishes one bootstrapper per version. Before doing any
//! install or launch work the running launcher makes sure it *is* that
//! bootstrapper. If it is not, it starts the published copy with the same
//! arguments and exits.
//!
//! # Modules
//!
//! - [`self_updater`] - the [`SelfUpdateGate`] state machine
//!   (`NeedBootstrapper -> UpToDate | Handoff`)
//! - [`verification`] - SHA-256 content hashing

pub mod self_updater;
pub mod verification;

pub use self_updater::{GateState, SelfUpdateGate};
pub use verification::ChecksumVerifier;
