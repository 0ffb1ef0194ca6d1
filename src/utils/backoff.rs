//! Exponential backoff between endpoint attempts.

use crate::constants::MAX_BACKOFF_DELAY_MS;
use std::time::Duration;

/// Delay for the given attempt: `starting_ms * 2^attempt`, capped at
/// [`MAX_BACKOFF_DELAY_MS`]. A zero starting delay disables backoff.
pub fn backoff_delay(attempt: u32, starting_ms: u64) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    let delay = starting_ms.saturating_mul(factor).min(MAX_BACKOFF_DELAY_MS);
    Duration::from_millis(delay)
}

/// Sleeps for [`backoff_delay`] and returns the next attempt number.
pub async fn exponential_backoff_with_delay(attempt: u32, starting_ms: u64) -> u32 {
    let delay = backoff_delay(attempt, starting_ms);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    attempt.saturating_add(1)
}
