//! Retry with exponential backoff for model endpoint calls.
//!
//! Only [transient](crate::StrategyError::is_transient) failures are
//! retried: rate limits, 5xx responses (including the 503 an inference
//! server returns while weights are loading), and network errors. A 4xx or
//! a malformed body fails immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::StrategyError;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (0 = single attempt).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Scale delays down by a per-attempt factor so concurrent chunk calls
    /// don't retry in lockstep.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Default backoff with the given number of retries.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self::with_retries(0)
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        if self.jitter {
            // Deterministic jitter keeps rand out of the dependency tree.
            let factor = match attempt % 4 {
                0 => 0.75,
                1 => 0.90,
                2 => 0.60,
                _ => 0.85,
            };
            Duration::from_secs_f64(capped * factor)
        } else {
            Duration::from_secs_f64(capped)
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or retries run out.
///
/// `label` names the operation in log lines.
pub async fn with_backoff<T, F, Fut>(
    config: &RetryConfig,
    label: &str,
    mut op: F,
) -> Result<T, StrategyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StrategyError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    "{label}: attempt {} failed ({e}); retrying in {:.2}s",
                    attempt + 1,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(retries: u32) -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..RetryConfig::with_retries(retries)
        }
    }

    #[test]
    fn delay_increases_exponentially() {
        let config = RetryConfig {
            jitter: false,
            ..RetryConfig::with_retries(5)
        };
        let d0 = config.delay_for_attempt(0);
        let d1 = config.delay_for_attempt(1);
        let d2 = config.delay_for_attempt(2);
        assert!(d1 > d0, "d1={d1:?} should be > d0={d0:?}");
        assert!(d2 > d1, "d2={d2:?} should be > d1={d1:?}");
    }

    #[test]
    fn delay_capped_at_max() {
        let config = RetryConfig {
            jitter: false,
            max_delay: Duration::from_secs(2),
            ..RetryConfig::with_retries(10)
        };
        assert!(config.delay_for_attempt(10) <= Duration::from_secs(2));
    }

    #[test]
    fn jitter_never_lengthens_delay() {
        let jittered = RetryConfig::with_retries(3);
        let plain = RetryConfig {
            jitter: false,
            ..RetryConfig::with_retries(3)
        };
        for attempt in 0..4 {
            assert!(jittered.delay_for_attempt(attempt) <= plain.delay_for_attempt(attempt));
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let calls = &AtomicU32::new(0);
        let result = with_backoff(&fast(3), "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(StrategyError::Http {
                    status: 503,
                    body: "loading".into(),
                })
            } else {
                Ok("done")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = with_backoff(&fast(3), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StrategyError::Http {
                status: 400,
                body: "bad input".into(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = with_backoff(&fast(2), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StrategyError::Request("connection refused".into()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
