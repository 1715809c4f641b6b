//! Retry policy shared by every LLM call site.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::llm_client::LlmError;

/// Bounded exponential backoff with a special case for rate limiting: a 429
/// waits for the provider's `Retry-After` (or `rate_limit_wait`) instead of
/// the backoff delay, and still counts as one attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
    pub rate_limit_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
            rate_limit_wait: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Delay after the `failed_attempts`-th failure: base, base*m, base*m², ...
    pub fn backoff_delay(&self, failed_attempts: u32) -> Duration {
        self.base_delay * self.multiplier.saturating_pow(failed_attempts.saturating_sub(1))
    }

    pub fn delay_for(&self, failed_attempts: u32, error: &LlmError) -> Duration {
        match error {
            LlmError::RateLimited { retry_after } => retry_after.unwrap_or(self.rate_limit_wait),
            _ => self.backoff_delay(failed_attempts),
        }
    }

    /// Runs `operation` until it succeeds or `max_attempts` is used up, and
    /// returns the last error in the latter case.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    warn!("{label}: giving up after {attempt} attempt(s): {e}");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt, &e);
                    warn!(
                        "{label}: attempt {attempt}/{} failed ({e}), retrying after {}ms...",
                        self.max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_backoff_doubles_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
    }

    #[test]
    fn test_rate_limit_uses_retry_after_or_fallback() {
        let policy = RetryPolicy::default();
        let with_header = LlmError::RateLimited {
            retry_after: Some(Duration::from_secs(5)),
        };
        let without_header = LlmError::RateLimited { retry_after: None };
        assert_eq!(policy.delay_for(2, &with_header), Duration::from_secs(5));
        assert_eq!(policy.delay_for(1, &without_header), Duration::from_secs(60));
    }

    #[test]
    fn test_max_attempts_never_below_one() {
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_succeeds_after_backoff() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let start = Instant::now();

        let result = policy
            .run("test", || {
                calls += 1;
                let n = calls;
                async move {
                    if n < 3 {
                        Err(LlmError::EmptyContent)
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(3100), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_returns_last_error_when_exhausted() {
        let policy = RetryPolicy::default();
        let mut calls = 0;

        let result: Result<(), LlmError> = policy
            .run("test", || {
                calls += 1;
                let status = 500 + calls;
                async move {
                    Err(LlmError::Api {
                        status,
                        message: "boom".to_string(),
                    })
                }
            })
            .await;

        assert_eq!(calls, 3);
        assert!(matches!(result, Err(LlmError::Api { status: 503, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_for_retry_after() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let start = Instant::now();

        let result = policy
            .run("test", || {
                calls += 1;
                let n = calls;
                async move {
                    if n == 1 {
                        Err(LlmError::RateLimited {
                            retry_after: Some(Duration::from_secs(7)),
                        })
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(7), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(7100), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy_does_not_retry() {
        let policy = RetryPolicy::default().with_max_attempts(1);
        let mut calls = 0;
        let result: Result<(), LlmError> = policy
            .run("test", || {
                calls += 1;
                async { Err(LlmError::EmptyContent) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
