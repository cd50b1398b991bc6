//! Polling policy for long-running provider operations.
//!
//! Video generation is asynchronous on the provider side: the request
//! returns an operation handle that must be polled until it reports done.
//! [`PollPolicy`] bounds that loop by elapsed time so a stuck operation
//! eventually surfaces as an error instead of polling forever.

use std::time::Duration;

/// Default delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default upper bound on total polling time.
pub const DEFAULT_POLL_MAX_ELAPSED: Duration = Duration::from_secs(15 * 60);

/// Tunable parameters for operation polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status checks.
    pub interval: Duration,
    /// Give up once this much time has been spent waiting.
    pub max_elapsed: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_elapsed: DEFAULT_POLL_MAX_ELAPSED,
        }
    }
}

impl PollPolicy {
    /// Whether another wait of `interval` still fits in the budget.
    pub fn allows_another_wait(&self, elapsed: Duration) -> bool {
        elapsed + self.interval <= self.max_elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_ten_seconds() {
        assert_eq!(PollPolicy::default().interval, Duration::from_secs(10));
    }

    #[test]
    fn another_wait_respects_budget() {
        let policy = PollPolicy {
            interval: Duration::from_secs(10),
            max_elapsed: Duration::from_secs(30),
        };
        assert!(policy.allows_another_wait(Duration::from_secs(20)));
        assert!(!policy.allows_another_wait(Duration::from_secs(21)));
    }
}
