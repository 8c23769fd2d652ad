//! Retry with exponential backoff for transient provider failures.
//!
//! A bounded retry wrapper around a fallible async operation, parameterized
//! by the retryable-error predicate and the backoff schedule so it can be
//! exercised with stub operations under a paused clock.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Backoff schedule and attempt budget for transient failures.
///
/// The delay before retry `n` (after `n` failed attempts) is
/// `base * 2^n`, raised to `min_delay` and capped at `max_delay`. With the
/// defaults that is 2s, then 4s, never above 10s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, counting the first one.
    pub max_attempts: u32,
    /// Base delay multiplied by `2^attempt`.
    #[serde(with = "duration_ms")]
    pub base: Duration,
    /// Lower bound on the computed delay.
    #[serde(with = "duration_ms")]
    pub min_delay: Duration,
    /// Upper bound on the computed delay.
    #[serde(with = "duration_ms")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    pub fn with_delay_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self
    }

    /// Delay inserted after `attempt` failed attempts (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let exponential = (self.base.as_millis() as u64).saturating_mul(factor);
        let bounded = exponential
            .max(self.min_delay.as_millis() as u64)
            .min(self.max_delay.as_millis() as u64);
        Duration::from_millis(bounded)
    }
}

/// Outcome of a retried operation, with attempt accounting for observability.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// `Ok` from the first clean attempt, or the error that ended the run.
    pub result: Result<T, E>,
    /// Attempts actually made (1 = first try settled it).
    pub attempts: u32,
    /// Wall time across attempts and backoff sleeps.
    pub total_duration: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    /// Convert to a standard `Result`, dropping the accounting.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` with bounded retries on errors accepted by `is_retryable`.
///
/// The operation receives the 1-based attempt number. A warning naming the
/// failed attempt is emitted before every backoff sleep. Non-retryable errors
/// and the final attempt's error are returned without sleeping; once the
/// attempt budget is spent there is no further attempt.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    config: &RetryConfig,
    is_retryable: P,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let start = std::time::Instant::now();
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                    total_duration: start.elapsed(),
                };
            }
            Err(error) => {
                if attempt >= max_attempts || !is_retryable(&error) {
                    return RetryOutcome {
                        result: Err(error),
                        attempts: attempt,
                        total_duration: start.elapsed(),
                    };
                }

                let delay = config.delay_after(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "transient failure, backing off before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Durations serialized as integer milliseconds.
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast_config() -> RetryConfig {
        RetryConfig::default()
            .with_base(Duration::from_millis(1))
            .with_delay_bounds(Duration::from_millis(2), Duration::from_millis(10))
    }

    fn retryable(error: &String) -> bool {
        error.starts_with("transient")
    }

    #[test]
    fn default_schedule_matches_policy() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.delay_after(1), Duration::from_secs(2));
        assert_eq!(config.delay_after(2), Duration::from_secs(4));
        assert_eq!(config.delay_after(3), Duration::from_secs(8));
    }

    #[test]
    fn delay_is_raised_to_the_minimum() {
        let config = RetryConfig::default().with_base(Duration::from_millis(1));
        // 1ms * 2 is well below the 2s floor.
        assert_eq!(config.delay_after(1), Duration::from_secs(2));
    }

    #[test]
    fn delay_is_capped_at_the_maximum() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_after(4), Duration::from_secs(10));
        assert_eq!(config.delay_after(10), Duration::from_secs(10));
        // Shift overflow saturates instead of panicking.
        assert_eq!(config.delay_after(200), Duration::from_secs(10));
    }

    #[test]
    fn delays_are_non_decreasing() {
        let config = RetryConfig::default();
        let mut previous = Duration::ZERO;
        for attempt in 1..=16 {
            let delay = config.delay_after(attempt);
            assert!(delay >= previous);
            assert!(delay <= config.max_delay);
            previous = delay;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_makes_no_retry() {
        let calls = Cell::new(0u32);
        let outcome = retry_with_backoff(&fast_config(), retryable, |_attempt| {
            calls.set(calls.get() + 1);
            async { Ok::<_, String>("done") }
        })
        .await;

        assert_eq!(outcome.attempts, 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(outcome.into_result().unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn two_transient_failures_then_success() {
        let calls = Cell::new(0u32);
        let outcome = retry_with_backoff(&RetryConfig::default(), retryable, |attempt| {
            calls.set(calls.get() + 1);
            let result = if attempt < 3 {
                Err(format!("transient failure #{attempt}"))
            } else {
                Ok("recovered")
            };
            async move { result }
        })
        .await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(calls.get(), 3);
        assert_eq!(outcome.into_result().unwrap(), "recovered");
    }

    #[tokio::test(start_paused = true)]
    async fn three_transient_failures_exhaust_the_budget() {
        let calls = Cell::new(0u32);
        let outcome = retry_with_backoff(&RetryConfig::default(), retryable, |attempt| {
            calls.set(calls.get() + 1);
            async move { Err::<(), _>(format!("transient failure #{attempt}")) }
        })
        .await;

        // No fourth attempt.
        assert_eq!(outcome.attempts, 3);
        assert_eq!(calls.get(), 3);
        assert_eq!(outcome.into_result().unwrap_err(), "transient failure #3");
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_fails_on_first_attempt() {
        let calls = Cell::new(0u32);
        let outcome = retry_with_backoff(&RetryConfig::default(), retryable, |_attempt| {
            calls.set(calls.get() + 1);
            async { Err::<(), _>("fatal: bad request".to_string()) }
        })
        .await;

        assert_eq!(outcome.attempts, 1);
        assert_eq!(calls.get(), 1);
        assert!(outcome.into_result().unwrap_err().starts_with("fatal"));
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_error_after_non_retryable_attempts_still_stops() {
        // A retryable failure followed by a non-retryable one stops at the
        // non-retryable attempt, not at the budget.
        let calls = Cell::new(0u32);
        let outcome = retry_with_backoff(&RetryConfig::default(), retryable, |attempt| {
            calls.set(calls.get() + 1);
            let result: Result<(), String> = if attempt == 1 {
                Err("transient blip".to_string())
            } else {
                Err("fatal: unauthorized".to_string())
            };
            async move { result }
        })
        .await;

        assert_eq!(outcome.attempts, 2);
        assert_eq!(calls.get(), 2);
        assert!(outcome.into_result().unwrap_err().starts_with("fatal"));
    }

    #[test]
    fn config_serializes_durations_as_millis() {
        let config = RetryConfig::default();
        let value = serde_json::to_value(config).unwrap();
        assert_eq!(value["max_attempts"], 3);
        assert_eq!(value["base"], 1000);
        assert_eq!(value["min_delay"], 2000);
        assert_eq!(value["max_delay"], 10000);

        let roundtrip: RetryConfig = serde_json::from_value(value).unwrap();
        assert_eq!(roundtrip, config);
    }
}
