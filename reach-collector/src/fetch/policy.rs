//! Retry policy for fetches.

use std::time::Duration;

/// Default number of retries after the first attempt.
const DEFAULT_RETRIES: u32 = 3;

/// Default base delay for exponential backoff.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(700);

/// Default per-attempt timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How often to retry a fetch, how long to wait between attempts, and how
/// long a single attempt may take.
///
/// A fetch makes at most `retries + 1` attempts. Before attempt `k`
/// (`k >= 1`, the first attempt being `0`) it waits `base_delay * 2^(k-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl RetryPolicy {
    /// Create a policy with explicit values.
    pub fn new(retries: u32, base_delay: Duration, timeout: Duration) -> Self {
        Self {
            retries,
            base_delay,
            timeout,
        }
    }

    /// Set the retry count.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the backoff base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay to wait before attempt `attempt`.
    ///
    /// Attempt `0` is never delayed. Saturates at `Duration::MAX`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let shift = attempt - 1;
        if shift >= 64 {
            return Duration::MAX;
        }
        let nanos = self.base_delay.as_nanos().saturating_mul(1u128 << shift);
        u64::try_from(nanos)
            .map(Duration::from_nanos)
            .unwrap_or(Duration::MAX)
    }

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
