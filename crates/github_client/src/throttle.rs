//! Fixed-delay pacing between GitHub API calls.
//!
//! The patrol run issues every request sequentially and pauses for a fixed
//! interval after each one, keeping the request rate well below GitHub's
//! secondary rate limits without any adaptive machinery.

use std::time::Duration;

use tracing::trace;

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;

/// Spaces consecutive API calls by a fixed interval.
///
/// The pause happens after every call, successful or not, so the request
/// cadence stays constant across a whole run.
#[derive(Clone, Debug)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    /// Creates a throttle that pauses for `delay` after each call.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Returns the configured inter-call delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleeps for the configured interval. A zero delay returns immediately
    /// without yielding to the timer.
    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }

        trace!(delay_ms = self.delay.as_millis() as u64, "throttle pause");
        tokio::time::sleep(self.delay).await;
    }
}
