//! Retry policies: how many failures a single call may absorb.
//!
//! Semantics:
//! - A policy records each failed attempt through [`RetryPolicy::on_failure`] and answers whether
//!   another attempt is allowed.
//! - Permanent failures (see [`is_permanent_failure`]) end the call no matter how much budget is
//!   left.
//! - Policies are stateful and owned by exactly one call. Configured instances act as prototypes;
//!   the retry loop calls [`RetryPolicy::fresh`] to get a per-call copy.
//!
//! Invariants:
//! - Once exhausted, a policy stays exhausted.
//! - `on_failure` returns `false` for every permanent status.

use crate::clock::{Clock, MonotonicClock};
use crate::{Status, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Retry budget of the default time-bounded policy.
pub const DEFAULT_MAXIMUM_DURATION: Duration = Duration::from_secs(15 * 60);

/// True when retrying cannot fix the failure.
///
/// Only `Unavailable`, `ResourceExhausted`, `Internal` and `DeadlineExceeded` are transient.
pub fn is_permanent_failure(status: &Status) -> bool {
    !matches!(
        status.code(),
        StatusCode::Unavailable
            | StatusCode::ResourceExhausted
            | StatusCode::Internal
            | StatusCode::DeadlineExceeded
    )
}

/// Decides whether another attempt is permitted given the failure history.
pub trait RetryPolicy: Send + Sync + fmt::Debug {
    /// True when no further attempt is allowed.
    fn is_exhausted(&self) -> bool;

    /// Record a failed attempt. Returns true iff the caller may retry.
    fn on_failure(&mut self, status: &Status) -> bool;

    /// Classification used by `on_failure`.
    fn is_permanent_failure(&self, status: &Status) -> bool {
        is_permanent_failure(status)
    }

    /// A new instance with the same limits and no recorded failures.
    fn fresh(&self) -> Box<dyn RetryPolicy>;
}

/// Allows up to `maximum_failures` transient failures.
///
/// With `maximum_failures = 0` every call is a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitedErrorCountRetryPolicy {
    failure_count: usize,
    maximum_failures: usize,
}

impl LimitedErrorCountRetryPolicy {
    pub fn new(maximum_failures: usize) -> Self {
        Self { failure_count: 0, maximum_failures }
    }

    pub fn maximum_failures(&self) -> usize {
        self.maximum_failures
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }
}

impl RetryPolicy for LimitedErrorCountRetryPolicy {
    fn is_exhausted(&self) -> bool {
        self.failure_count > self.maximum_failures
    }

    fn on_failure(&mut self, status: &Status) -> bool {
        if self.is_permanent_failure(status) {
            return false;
        }
        self.failure_count = self.failure_count.saturating_add(1);
        !self.is_exhausted()
    }

    fn fresh(&self) -> Box<dyn RetryPolicy> {
        Box::new(Self::new(self.maximum_failures))
    }
}

/// Allows retries until `maximum_duration` has elapsed since the policy was created.
#[derive(Clone)]
pub struct LimitedTimeRetryPolicy {
    maximum_duration: Duration,
    deadline_millis: u64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for LimitedTimeRetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LimitedTimeRetryPolicy")
            .field("maximum_duration", &self.maximum_duration)
            .field("deadline_millis", &self.deadline_millis)
            .field("clock", &"<clock>")
            .finish()
    }
}

impl LimitedTimeRetryPolicy {
    pub fn new(maximum_duration: Duration) -> Self {
        Self::with_clock(maximum_duration, Arc::new(MonotonicClock::default()))
    }

    /// Use a custom clock; the deadline starts counting now.
    pub fn with_clock(maximum_duration: Duration, clock: Arc<dyn Clock>) -> Self {
        let budget = u64::try_from(maximum_duration.as_millis()).unwrap_or(u64::MAX);
        let deadline_millis = clock.now_millis().saturating_add(budget);
        Self { maximum_duration, deadline_millis, clock }
    }

    pub fn maximum_duration(&self) -> Duration {
        self.maximum_duration
    }
}

impl Default for LimitedTimeRetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAXIMUM_DURATION)
    }
}

impl RetryPolicy for LimitedTimeRetryPolicy {
    fn is_exhausted(&self) -> bool {
        self.clock.now_millis() > self.deadline_millis
    }

    fn on_failure(&mut self, status: &Status) -> bool {
        if self.is_permanent_failure(status) {
            return false;
        }
        !self.is_exhausted()
    }

    fn fresh(&self) -> Box<dyn RetryPolicy> {
        Box::new(Self::with_clock(self.maximum_duration, self.clock.clone()))
    }
}
