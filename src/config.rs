//! Serializable retry configuration.
//!
//! Every option can be set on its own; missing sections fall back to the defaults of
//! [`RetrierBuilder`].
//!
//! ```rust
//! use storage_retry::config::RetryConfig;
//!
//! let config = RetryConfig::from_json(r#"{
//!     "retry": { "kind": "limited-error-count", "maximum_failures": 5 },
//!     "backoff": { "initial_delay_ms": 10, "maximum_delay_ms": 1000, "jitter": "none" },
//!     "idempotency": "always"
//! }"#).unwrap();
//! let retrier = config.build().unwrap().build();
//! # let _ = retrier;
//! ```

use crate::backoff::{
    ExponentialBackoffPolicy, DEFAULT_INITIAL_DELAY, DEFAULT_MAXIMUM_DELAY, DEFAULT_SCALING_FACTOR,
};
use crate::error::ConfigError;
use crate::idempotency::{AlwaysRetryIdempotencyPolicy, StrictIdempotencyPolicy};
use crate::retry::RetrierBuilder;
use crate::retry_policy::{
    LimitedErrorCountRetryPolicy, LimitedTimeRetryPolicy, DEFAULT_MAXIMUM_DURATION,
};
use crate::Jitter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub retry: RetryPolicyConfig,
    pub backoff: BackoffConfig,
    pub idempotency: IdempotencyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RetryPolicyConfig {
    LimitedErrorCount { maximum_failures: usize },
    LimitedTime { maximum_duration_ms: u64 },
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        RetryPolicyConfig::LimitedTime {
            maximum_duration_ms: duration_to_millis(DEFAULT_MAXIMUM_DURATION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackoffConfig {
    pub initial_delay_ms: u64,
    pub maximum_delay_ms: u64,
    pub scaling_factor: f64,
    pub jitter: Jitter,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: duration_to_millis(DEFAULT_INITIAL_DELAY),
            maximum_delay_ms: duration_to_millis(DEFAULT_MAXIMUM_DELAY),
            scaling_factor: DEFAULT_SCALING_FACTOR,
            jitter: Jitter::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdempotencyConfig {
    #[default]
    Strict,
    Always,
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl RetryConfig {
    /// Parse a JSON document. Missing sections keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Validate the configuration and turn it into a builder.
    ///
    /// The sleeper is left at its default; tests may still replace it.
    pub fn build(&self) -> Result<RetrierBuilder, ConfigError> {
        let backoff = ExponentialBackoffPolicy::new(
            Duration::from_millis(self.backoff.initial_delay_ms),
            Duration::from_millis(self.backoff.maximum_delay_ms),
            self.backoff.scaling_factor,
        )?
        .with_jitter(self.backoff.jitter);

        let builder = RetrierBuilder::new().backoff_policy(backoff);
        let builder = match self.retry {
            RetryPolicyConfig::LimitedErrorCount { maximum_failures } => {
                builder.retry_policy(LimitedErrorCountRetryPolicy::new(maximum_failures))
            }
            RetryPolicyConfig::LimitedTime { maximum_duration_ms } => {
                let maximum_duration = Duration::from_millis(maximum_duration_ms);
                builder.retry_policy(LimitedTimeRetryPolicy::new(maximum_duration))
            }
        };
        let builder = match self.idempotency {
            IdempotencyConfig::Strict => builder.idempotency_policy(StrictIdempotencyPolicy),
            IdempotencyConfig::Always => builder.idempotency_policy(AlwaysRetryIdempotencyPolicy),
        };
        Ok(builder)
    }
}
