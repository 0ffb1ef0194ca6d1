//! Download progress display.
//!
//! Wraps `indicatif` so the rest of the launcher never touches styling or the
//! "is progress enabled" decision. Progress is disabled by `--no-progress` or
//! the `BUBBA_NO_PROGRESS` environment variable (both surface as
//! [`CliConfig::no_progress`](crate::cli::CliConfig)), and is always hidden
//! when stderr is not a terminal because indicatif draws nothing there.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

/// A download progress bar with the launcher's styling.
///
/// When created disabled the bar is hidden and every call is a no-op, so
/// callers do not need to branch on whether progress is shown.
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a byte-counting bar.
    ///
    /// With a known `total` the bar shows a filled track and ETA. With no
    /// `Content-Length` it falls back to a spinner that still counts bytes.
    pub fn download(total: Option<u64>, enabled: bool) -> Self {
        let inner = if !enabled {
            IndicatifBar::hidden()
        } else if let Some(total) = total {
            let bar = IndicatifBar::new(total);
            if let Ok(style) = ProgressStyle::download() {
                bar.set_style(style);
            }
            bar
        } else {
            let bar = IndicatifBar::new_spinner();
            if let Ok(style) = ProgressStyle::unknown_length() {
                bar.set_style(style);
            }
            bar
        };
        Self { inner }
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Launcher progress styles.
pub struct ProgressStyle;

impl ProgressStyle {
    /// ```text
    /// BubbaversePlayerLinuxLauncher [━━━━━━━━━━╸━━━━━━━━━] 12.1 MiB/30.0 MiB (00:05)
    /// ```
    pub fn download() -> Result<IndicatifStyle, indicatif::style::TemplateError> {
        Ok(IndicatifStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
            .progress_chars("━╸━"))
    }

    pub fn unknown_length() -> Result<IndicatifStyle, indicatif::style::TemplateError> {
        Ok(IndicatifStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.cyan} {bytes} ({bytes_per_sec})")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]))
    }
}
