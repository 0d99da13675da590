//! Caller-side retry with configurable backoff and jitter.
//!
//! The orchestrator never retries. Callers that drive stages themselves can
//! wrap a single stage call in [`with_retry`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::AutoblogError;

/// Backoff strategy for retry delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// delay = base * 2^retry
    #[default]
    Exponential,
    /// delay = base * (retry + 1)
    Linear,
    /// delay = base
    Constant,
}

/// Jitter applied on top of the backoff delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// No jitter.
    None,
    /// Uniform in `0..=delay`.
    #[default]
    Full,
    /// Half fixed, half uniform.
    Equal,
}

/// Configuration for caller-side retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first. Zero behaves as one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Base delay in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Delay cap in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Backoff strategy.
    #[serde(default)]
    pub backoff: BackoffStrategy,
    /// Jitter strategy.
    #[serde(default)]
    pub jitter: JitterStrategy,
}

fn default_max_attempts() -> usize {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff: BackoffStrategy::default(),
            jitter: JitterStrategy::default(),
        }
    }
}

impl RetryConfig {
    /// Creates a retry config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub fn with_max_delay_ms(mut self, delay: u64) -> Self {
        self.max_delay_ms = delay;
        self
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Sets the jitter strategy.
    #[must_use]
    pub fn with_jitter(mut self, strategy: JitterStrategy) -> Self {
        self.jitter = strategy;
        self
    }

    /// Delay before retry number `retry` (0 for the first retry).
    #[must_use]
    pub fn delay_for(&self, retry: usize) -> Duration {
        let base = self.base_delay_ms;
        let exponent = u32::try_from(retry).unwrap_or(u32::MAX);
        let delay = match self.backoff {
            BackoffStrategy::Exponential => base.saturating_mul(2u64.saturating_pow(exponent)),
            BackoffStrategy::Linear => base.saturating_mul(u64::from(exponent).saturating_add(1)),
            BackoffStrategy::Constant => base,
        }
        .min(self.max_delay_ms);

        let jittered = match self.jitter {
            JitterStrategy::None => delay,
            JitterStrategy::Full if delay > 0 => rand::thread_rng().gen_range(0..=delay),
            JitterStrategy::Equal if delay / 2 > 0 => {
                let half = delay / 2;
                half + rand::thread_rng().gen_range(0..=half)
            }
            JitterStrategy::Full | JitterStrategy::Equal => delay,
        };
        Duration::from_millis(jittered)
    }
}

/// Errors that know whether repeating the call can help.
pub trait Retryable {
    /// Returns true if another attempt may succeed.
    fn is_retryable(&self) -> bool;
}

impl Retryable for AutoblogError {
    fn is_retryable(&self) -> bool {
        AutoblogError::is_retryable(self)
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// `config.max_attempts` attempts have been made.
///
/// `key` labels the operation in logs.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, key: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display + Retryable,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() => {
                tracing::debug!(key, attempt, error = %e, "Not retrying non-retryable error");
                return Err(e);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::warn!(key, attempts = attempt, error = %e, "Retries exhausted");
                return Err(e);
            }
            Err(e) => {
                let delay = config.delay_for(attempt - 1);
                tracing::debug!(
                    key,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "Retrying after error"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PipelineStage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::new()
            .with_base_delay_ms(1)
            .with_jitter(JitterStrategy::None)
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_attempts": 5, "backoff": "linear"}"#).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.backoff, BackoffStrategy::Linear);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.jitter, JitterStrategy::Full);
    }

    #[test]
    fn test_delay_strategies_without_jitter() {
        let config = RetryConfig::new()
            .with_base_delay_ms(100)
            .with_jitter(JitterStrategy::None);

        let exponential: Vec<u128> = (0..3).map(|r| config.delay_for(r).as_millis()).collect();
        assert_eq!(exponential, vec![100, 200, 400]);

        let linear = config.clone().with_backoff(BackoffStrategy::Linear);
        assert_eq!(linear.delay_for(2), Duration::from_millis(300));

        let constant = config.clone().with_backoff(BackoffStrategy::Constant);
        assert_eq!(constant.delay_for(7), Duration::from_millis(100));
    }

    #[test]
    fn test_delay_capped() {
        let config = RetryConfig::new()
            .with_base_delay_ms(1000)
            .with_max_delay_ms(5000)
            .with_jitter(JitterStrategy::None);
        assert_eq!(config.delay_for(10), Duration::from_millis(5000));
        assert_eq!(config.delay_for(200), Duration::from_millis(5000));
    }

    #[test]
    fn test_jitter_bounds() {
        let full = RetryConfig::new().with_base_delay_ms(100);
        let equal = full.clone().with_jitter(JitterStrategy::Equal);
        for _ in 0..50 {
            assert!(full.delay_for(0) <= Duration::from_millis(100));
            let d = equal.delay_for(0);
            assert!(d >= Duration::from_millis(50) && d <= Duration::from_millis(100));
        }
    }

    #[tokio::test]
    async fn test_with_retry_recovers() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(&fast(), "draft", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AutoblogError::draft("provider busy"))
            } else {
                Ok("draft")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "draft");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_exhausts() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry(&fast().with_max_attempts(2), "brief", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AutoblogError::timeout(PipelineStage::Brief, Duration::from_secs(1)))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_retry_skips_non_retryable() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry(&fast(), "research", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AutoblogError::InvalidRequest("empty topic".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let calls = AtomicUsize::new(0);
        let _: Result<(), AutoblogError> = with_retry(&fast().with_max_attempts(0), "x", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AutoblogError::storage("down"))
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
