//! Retry loop with exponential backoff.
//!
//! The loop only decides *when* to try again; the waiting itself goes
//! through a [`Sleeper`] so tests can run the loop on a fake clock.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::policy::RetryPolicy;

/// Something that can wait for a duration.
pub trait Sleeper {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

impl<S: Sleeper> Sleeper for &S {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        (**self).sleep(duration)
    }
}

/// Run `attempt` until it succeeds or `policy.retries` retries are used up.
///
/// `attempt` receives the zero-based attempt number. Before each retry the
/// loop waits `policy.backoff(k)`. When every attempt fails, the error from
/// the last attempt is returned.
pub async fn retry_with_backoff<T, E, S, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut attempt: F,
) -> Result<T, E>
where
    E: Display,
    S: Sleeper,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut n = 0;
    loop {
        match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(e) if n < policy.retries => {
                n += 1;
                let delay = policy.backoff(n);
                warn!(
                    attempt = n,
                    retries = policy.retries,
                    delay_ms = millis(delay),
                    error = %e,
                    "attempt failed, backing off"
                );
                sleeper.sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Whole milliseconds of `delay`, saturating for the capped backoff.
fn millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Sleeper that returns immediately and records every requested delay.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSleeper {
    delays: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl RecordingSleeper {
    pub(crate) fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.delays.lock().unwrap().push(duration);
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_retries(retries)
            .with_base_delay(Duration::from_millis(100))
    }

    /// Attempt closure failing the first `failures` times.
    fn failing(failures: u32, calls: &Cell<u32>) -> impl FnMut(u32) -> std::future::Ready<Result<&'static str, String>> + '_ {
        move |n| {
            calls.set(calls.get() + 1);
            if n < failures {
                std::future::ready(Err(format!("failure {n}")))
            } else {
                std::future::ready(Ok("done"))
            }
        }
    }

    #[tokio::test]
    async fn first_attempt_success_never_sleeps() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let result = retry_with_backoff(&policy(3), &sleeper, failing(0, &calls)).await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.get(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn succeeds_on_last_allowed_attempt() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let result = retry_with_backoff(&policy(3), &sleeper, failing(3, &calls)).await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.get(), 4);
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400),
            ]
        );
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_error() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let result = retry_with_backoff(&policy(3), &sleeper, failing(4, &calls)).await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.get(), 4);
        assert_eq!(sleeper.delays().len(), 3);
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);

        let result = retry_with_backoff(&policy(0), &sleeper, failing(1, &calls)).await;

        assert_eq!(result, Err("failure 0".to_string()));
        assert_eq!(calls.get(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn logged_delay_saturates() {
        assert_eq!(millis(Duration::from_millis(700)), 700);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn saturated_backoff_is_still_slept() {
        let sleeper = RecordingSleeper::default();
        let calls = Cell::new(0);
        let policy = RetryPolicy::default()
            .with_retries(1)
            .with_base_delay(Duration::MAX);

        let result = retry_with_backoff(&policy, &sleeper, failing(1, &calls)).await;

        assert_eq!(result, Ok("done"));
        assert_eq!(sleeper.delays(), vec![Duration::MAX]);
    }
}
