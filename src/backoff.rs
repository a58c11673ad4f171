//! Backoff policies for the retry loop.
//!
//! A backoff policy is stateful: every call to [`BackoffPolicy::on_completion`] returns the delay
//! to wait before the next attempt and grows the bound for the call after it. Each top-level call
//! owns its own instance, obtained from a configured prototype through [`BackoffPolicy::fresh`].
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use storage_retry::{BackoffPolicy, ExponentialBackoffPolicy, Jitter};
//!
//! let mut backoff = ExponentialBackoffPolicy::new(
//!     Duration::from_millis(100),
//!     Duration::from_millis(500),
//!     2.0,
//! )
//! .unwrap()
//! .with_jitter(Jitter::None);
//! assert_eq!(backoff.on_completion(), Duration::from_millis(100));
//! assert_eq!(backoff.on_completion(), Duration::from_millis(200));
//! assert_eq!(backoff.on_completion(), Duration::from_millis(400));
//! assert_eq!(backoff.on_completion(), Duration::from_millis(500)); // capped
//! ```

use crate::Jitter;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAXIMUM_DELAY: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SCALING_FACTOR: f64 = 2.0;

/// Errors returned by backoff configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackoffError {
    #[error("maximum delay ({maximum:?}) must be >= initial delay ({initial:?})")]
    MaxLessThanInitial { initial: Duration, maximum: Duration },
    #[error("scaling factor must be greater than 1.0 (got {0})")]
    ScalingFactorTooSmall(f64),
}

/// Computes the delay between retry attempts.
pub trait BackoffPolicy: Send + Sync + fmt::Debug {
    /// Delay before the next attempt. Advances the internal schedule.
    fn on_completion(&mut self) -> Duration;

    /// A new instance with the same configuration and a reset schedule.
    fn fresh(&self) -> Box<dyn BackoffPolicy>;
}

/// Exponential backoff with a cap and optional jitter.
///
/// Each call returns `min(current, maximum)` (jittered when enabled) and then multiplies
/// `current` by the scaling factor. `current` is stored already capped, so the schedule never
/// overflows and never shrinks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoffPolicy {
    initial_delay: Duration,
    maximum_delay: Duration,
    scaling_factor: f64,
    jitter: Jitter,
    current_delay: Duration,
}

impl ExponentialBackoffPolicy {
    /// Build a policy; fails if `initial_delay > maximum_delay` or `scaling_factor <= 1.0`.
    ///
    /// Jitter defaults to [`Jitter::Full`].
    pub fn new(
        initial_delay: Duration,
        maximum_delay: Duration,
        scaling_factor: f64,
    ) -> Result<Self, BackoffError> {
        if initial_delay > maximum_delay {
            return Err(BackoffError::MaxLessThanInitial {
                initial: initial_delay,
                maximum: maximum_delay,
            });
        }
        if scaling_factor.is_nan() || scaling_factor <= 1.0 {
            return Err(BackoffError::ScalingFactorTooSmall(scaling_factor));
        }
        Ok(Self {
            initial_delay,
            maximum_delay,
            scaling_factor,
            jitter: Jitter::Full,
            current_delay: initial_delay,
        })
    }

    /// Set the jitter strategy.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn maximum_delay(&self) -> Duration {
        self.maximum_delay
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn jitter(&self) -> Jitter {
        self.jitter
    }

    fn next_bound(&self) -> Duration {
        let scaled = (self.current_delay.as_nanos() as f64 * self.scaling_factor).round();
        if scaled >= self.maximum_delay.as_nanos() as f64 {
            return self.maximum_delay;
        }
        // float-to-int casts saturate
        Duration::from_nanos(scaled as u64)
    }
}

/// 1 second initial delay, 5 minute cap, factor 2, full jitter.
impl Default for ExponentialBackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            maximum_delay: DEFAULT_MAXIMUM_DELAY,
            scaling_factor: DEFAULT_SCALING_FACTOR,
            jitter: Jitter::Full,
            current_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl BackoffPolicy for ExponentialBackoffPolicy {
    fn on_completion(&mut self) -> Duration {
        let bound = self.current_delay.min(self.maximum_delay);
        self.current_delay = self.next_bound().max(bound);
        self.jitter.apply(bound).min(self.maximum_delay)
    }

    fn fresh(&self) -> Box<dyn BackoffPolicy> {
        Box::new(Self { current_delay: self.initial_delay, ..self.clone() })
    }
}
