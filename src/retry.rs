use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How often and how patiently to retry a failing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_retries: u32,
    /// Delay unit; the wait after attempt `n` is `base_delay * n`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Wait before the attempt following `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// Every failure is treated as retryable. The last failure is returned
/// unchanged once attempts are exhausted.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Succeeded on attempt {}/{}", attempt, attempts);
                }
                return Ok(value);
            }
            Err(err) if attempt < attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} failed: {} (retrying in {}ms)",
                    attempt,
                    attempts,
                    err,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!("Giving up after {} attempts: {}", attempts, err);
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_two_failures() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = with_retry(RetryPolicy::default(), || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(format!("failure {}", call))
                } else {
                    Ok(call)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Linear backoff: 1s after the first failure, 2s after the second
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(3000));
        assert!(waited < Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_error_when_exhausted() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = with_retry(RetryPolicy::new(4, Duration::from_millis(10)), || {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(format!("failure {}", call)) }
        })
        .await;

        assert_eq!(result, Err("failure 4".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_wait() {
        let started = Instant::now();
        let result: Result<&str, String> =
            with_retry(RetryPolicy::default(), || async { Ok("ok") }).await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_still_attempts_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = with_retry(RetryPolicy::new(0, Duration::from_millis(10)), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("boom".to_string()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
