//! The completion sentinel (`AppSettings.xml`).
//!
//! The client also reads this file for its content folder and base URL, so
//! the bytes must match exactly: four-space indentation, no trailing newline.

use crate::utils::fs::atomic_write;
use anyhow::Result;
use std::path::Path;

pub fn render_sentinel(base_host: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Settings>\n    \
             <ContentFolder>content</ContentFolder>\n    \
             <BaseUrl>http://{base_host}</BaseUrl>\n\
         </Settings>"
    )
}

/// Writes the sentinel atomically, so its presence always means complete.
pub fn write_sentinel(path: &Path, base_host: &str) -> Result<()> {
    atomic_write(path, render_sentinel(base_host).as_bytes())
}
