//! Integration test suite for the Bubbaverse launcher
//!
//! End-to-end runs of the launcher against in-memory setup servers, plus a
//! few checks of the compiled binary that never touch the network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **bootstrap_flow**: full runs from version lookup to client launch
//! - **failover**: setup server failover and connectivity errors
//! - **self_update**: handoff to the published bootstrapper
//! - **cli**: the compiled binary's help, version and config errors

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod bootstrap_flow;
mod cli;
mod failover;
mod self_update;
