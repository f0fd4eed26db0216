//! Retry policy for transient transport failures.
//!
//! Only failures a venue may plausibly recover from are retried: timeouts,
//! dropped connections, `429` and `5xx` answers. Everything else is returned
//! on the first attempt.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use std::time::Duration;

use crate::error::{Error, RawError, Result};

lazy_static! {
    /// Server-side failure phrases in opaque transport errors. Word boundaries keep
    /// ids like "15001234" from matching.
    static ref SERVER_ERROR_PATTERN: Regex = Regex::new(
        r"(?i)\b(500|502|503|504)\b|internal server error|bad gateway|service unavailable|gateway timeout"
    ).expect("Invalid server error regex pattern");
}

/// Backoff shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategyType {
    /// Constant delay.
    Fixed,
    /// `base_delay * 2^(attempt - 1)`.
    Exponential,
    /// `base_delay * attempt`.
    Linear,
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff shape.
    pub strategy_type: RetryStrategyType,
    /// Base delay in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound on any single delay.
    pub max_delay_ms: u64,
    /// Retry timeouts and dropped connections.
    pub retry_on_network_error: bool,
    /// Retry `429` answers.
    pub retry_on_rate_limit: bool,
    /// Retry `5xx` answers.
    pub retry_on_server_error: bool,
    /// Jitter factor, 0.0 to 1.0.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            strategy_type: RetryStrategyType::Exponential,
            base_delay_ms: 100,
            max_delay_ms: 30_000,
            retry_on_network_error: true,
            retry_on_rate_limit: true,
            retry_on_server_error: true,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Fewer retries, fixed delay, server errors not retried.
    pub fn conservative() -> Self {
        Self {
            max_retries: 2,
            strategy_type: RetryStrategyType::Fixed,
            base_delay_ms: 500,
            max_delay_ms: 5_000,
            retry_on_server_error: false,
            jitter_factor: 0.0,
            ..Self::default()
        }
    }

    /// Rejects configurations that would hammer a venue.
    pub fn validate(&self) -> Result<()> {
        if self.max_retries > 10 {
            return Err(Error::invalid_argument(format!(
                "retry.max_retries must be <= 10, got {}",
                self.max_retries
            )));
        }
        if self.max_retries > 0 && self.base_delay_ms < 10 {
            return Err(Error::invalid_argument(format!(
                "retry.base_delay_ms must be >= 10, got {}",
                self.base_delay_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(Error::invalid_argument(format!(
                "retry.jitter_factor must be within 0.0..=1.0, got {}",
                self.jitter_factor
            )));
        }
        Ok(())
    }
}

/// Decides whether and when to retry a failed request.
#[derive(Debug, Clone)]
pub struct RetryStrategy {
    config: RetryConfig,
}

impl RetryStrategy {
    /// Strategy for `config`.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Whether `error` should be retried as retry number `attempt` (1-based).
    pub fn should_retry(&self, error: &RawError, attempt: u32) -> bool {
        if attempt > self.config.max_retries {
            return false;
        }
        match error {
            RawError::Timeout | RawError::Connection(_) => self.config.retry_on_network_error,
            RawError::Status { status: 429, .. } => self.config.retry_on_rate_limit,
            RawError::Status { status, .. } => {
                self.config.retry_on_server_error && Self::is_server_error_code(*status)
            }
            RawError::Transport(source) => {
                self.config.retry_on_server_error
                    && Self::is_server_error_message(&source.to_string())
            }
            _ => false,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    ///
    /// A `Retry-After` sent with a `429` wins over the computed backoff, capped
    /// at `max_delay_ms`.
    pub fn calculate_delay(&self, attempt: u32, error: &RawError) -> Duration {
        let base = self.config.base_delay_ms;
        let mut delay = match self.config.strategy_type {
            RetryStrategyType::Fixed => base,
            RetryStrategyType::Exponential => {
                base.saturating_mul(2_u64.saturating_pow(attempt.saturating_sub(1)))
            }
            RetryStrategyType::Linear => base.saturating_mul(u64::from(attempt)),
        };

        if let RawError::Status {
            retry_after: Some(after),
            ..
        } = error
        {
            delay = delay.max(u64::try_from(after.as_millis()).unwrap_or(u64::MAX));
        }

        delay = delay.min(self.config.max_delay_ms);
        if self.config.jitter_factor > 0.0 {
            delay = self.apply_jitter(delay);
        }
        Duration::from_millis(delay)
    }

    fn apply_jitter(&self, delay_ms: u64) -> u64 {
        let mut rng = rand::rng();
        #[allow(clippy::cast_precision_loss)]
        #[allow(clippy::cast_possible_truncation)]
        let jitter_range = (delay_ms as f64 * self.config.jitter_factor) as u64;
        delay_ms.saturating_add(rng.random_range(0..=jitter_range))
    }

    /// Whether `status` is a 5xx.
    pub fn is_server_error_code(status: u16) -> bool {
        (500..600).contains(&status)
    }

    /// Whether an error text describes a server-side failure.
    ///
    /// ```rust
    /// use pmxt_core::transport::RetryStrategy;
    ///
    /// assert!(RetryStrategy::is_server_error_message("HTTP 502 Bad Gateway"));
    /// assert!(!RetryStrategy::is_server_error_message("market_id: 15001234"));
    /// ```
    pub fn is_server_error_message(msg: &str) -> bool {
        SERVER_ERROR_PATTERN.is_match(msg)
    }

    /// The configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
