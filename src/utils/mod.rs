//! Cross-platform utilities and helpers
//!
//! - [`fs`] - Directory creation, atomic writes and tolerant removal
//! - [`progress`] - Download progress bars
//! - [`backoff`] - Exponential backoff between endpoint attempts

pub mod backoff;
pub mod fs;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, remove_path};
pub use progress::{ProgressBar, ProgressStyle};
