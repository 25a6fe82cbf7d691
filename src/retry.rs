use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::LoadError;

pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(300);

/// How many extra attempts a retriable failure gets, and the base delay
/// that doubles after each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }

    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    // backoff * 2^attempt, saturating instead of overflowing on silly configs.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }
}

/// Waits `delay`, or returns `Cancelled` as soon as the token fires.
pub async fn backoff_sleep(delay: Duration, token: &CancellationToken) -> Result<(), LoadError> {
    tokio::select! {
        _ = token.cancelled() => Err(LoadError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Runs `operation` until it succeeds, fails terminally, or the policy runs
/// out of retries. The last failure is returned when retries are exhausted.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    token: &CancellationToken,
    mut operation: F,
) -> Result<T, LoadError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LoadError>>,
{
    let mut attempt = 0;
    loop {
        if token.is_cancelled() {
            return Err(LoadError::Cancelled);
        }

        let err = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retriable() || attempt >= policy.retries {
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        log::debug!("attempt {} failed with {err}, retrying in {delay:?}", attempt + 1);
        backoff_sleep(delay, token).await?;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    // Paused time is millisecond-granular.
    fn close_to(actual: Duration, expected: Duration) -> bool {
        actual >= expected && actual <= expected + Duration::from_millis(2)
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(300));
        assert_eq!(policy.delay_for(1), Duration::from_millis(600));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_exactly_retries_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let token = CancellationToken::new();
        let counter = calls.clone();
        let result = retry_with_backoff(RetryPolicy::default(), &token, move |_| {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(LoadError::Status(503))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_last_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let token = CancellationToken::new();
        let counter = calls.clone();
        let result: Result<(), _> = retry_with_backoff(RetryPolicy::default(), &token, move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(LoadError::Status(500))
                } else {
                    Err(LoadError::Status(502))
                }
            }
        })
        .await;

        assert_eq!(result, Err(LoadError::Status(502)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retriable_short_circuits_without_delay() {
        let calls = Arc::new(AtomicU32::new(0));
        let token = CancellationToken::new();
        let counter = calls.clone();
        let started = Instant::now();
        let result: Result<(), _> = retry_with_backoff(RetryPolicy::default(), &token, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(LoadError::Status(404)) }
        })
        .await;

        assert_eq!(result, Err(LoadError::Status(404)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_timing() {
        let token = CancellationToken::new();
        let started = Instant::now();
        let attempts_at = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = attempts_at.clone();
        let _: Result<(), _> = retry_with_backoff(RetryPolicy::default(), &token, move |_| {
            log.lock().unwrap().push(started.elapsed());
            async { Err(LoadError::Transport("unreachable".into())) }
        })
        .await;

        let attempts_at = attempts_at.lock().unwrap().clone();
        let expected = [0, 300, 900].map(Duration::from_millis);
        assert_eq!(attempts_at.len(), expected.len());
        for (actual, expected) in attempts_at.iter().zip(expected) {
            assert!(close_to(*actual, expected), "{actual:?} vs {expected:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_backoff() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let result = backoff_sleep(Duration::from_secs(10), &token).await;
        assert_eq!(result, Err(LoadError::Cancelled));
        assert!(close_to(started.elapsed(), Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_cancelled_token_skips_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), _> =
            retry_with_backoff(RetryPolicy::default(), &token, |_| async { Ok(()) }).await;
        assert_eq!(result, Err(LoadError::Cancelled));
    }
}
