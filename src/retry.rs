//! The retry loop.
//!
//! [`execute`] runs one storage request against a single-attempt operation and decides, after
//! every failure, whether to back off and try again or to stop.
//!
//! Semantics:
//! - Idempotency is classified once, before the first attempt. Every request gets one attempt;
//!   only retries require the request to be idempotent.
//! - Retry and backoff policies are prototypes. Each call works on its own `fresh()` copies, so
//!   concurrent calls never share counters or delays.
//! - On failure the loop stops, in this order, for: an OK status in the error slot (contract
//!   violation), a permanent status code, a non-idempotent request, or an exhausted retry
//!   policy. Otherwise it sleeps for the next backoff delay and tries again.
//! - The returned [`RetryError`] carries the last observed status unchanged plus the reason the
//!   loop stopped.
//!
//! Invariants:
//! - Attempts are sequential: attempt N+1 starts only after attempt N finished and its backoff
//!   delay elapsed.
//! - The only suspension point besides the operation itself is the sleeper. Dropping the
//!   returned future there cancels the call before another attempt is dispatched.
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use storage_retry::{
//!     ExponentialBackoffPolicy, GetObjectMetadataRequest, InstantSleeper,
//!     LimitedErrorCountRetryPolicy, Retrier, Status, StatusCode,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let retrier = Retrier::builder()
//!     .retry_policy(LimitedErrorCountRetryPolicy::new(3))
//!     .backoff_policy(
//!         ExponentialBackoffPolicy::new(Duration::from_millis(10), Duration::from_secs(1), 2.0)
//!             .unwrap(),
//!     )
//!     .with_sleeper(InstantSleeper)
//!     .build();
//!
//! let request = GetObjectMetadataRequest::new("my-bucket", "my-object");
//! let mut failures = 2;
//! let result = retrier
//!     .execute(&request, || {
//!         let outcome = if failures > 0 {
//!             failures -= 1;
//!             Err(Status::new(StatusCode::Unavailable, "try again"))
//!         } else {
//!             Ok("metadata")
//!         };
//!         async move { outcome }
//!     })
//!     .await;
//! assert_eq!(result.unwrap(), "metadata");
//! # });
//! ```

use crate::backoff::{BackoffPolicy, ExponentialBackoffPolicy};
use crate::error::{RetryError, TerminationReason};
use crate::idempotency::{IdempotencyPolicy, StrictIdempotencyPolicy};
use crate::request::StorageRequest;
use crate::retry_policy::{LimitedTimeRetryPolicy, RetryPolicy};
use crate::sleeper::{Sleeper, TokioSleeper};
use crate::{Status, StatusOr};
use std::future::Future;
use std::sync::Arc;

/// Run `operation` until it succeeds or the policies say stop.
///
/// `operation` performs exactly one attempt of `request`. The policies are used as prototypes;
/// their own state is never modified.
pub async fn execute<R, T, Op, Fut>(
    request: &R,
    mut operation: Op,
    retry_policy: &dyn RetryPolicy,
    backoff_policy: &dyn BackoffPolicy,
    idempotency_policy: &dyn IdempotencyPolicy,
    sleeper: &dyn Sleeper,
) -> Result<T, RetryError>
where
    R: StorageRequest + ?Sized,
    Op: FnMut() -> Fut,
    Fut: Future<Output = StatusOr<T>>,
{
    let operation_name = request.operation_name();
    let idempotent = idempotency_policy.is_idempotent(&request);
    let mut retry = retry_policy.fresh();
    let mut backoff = backoff_policy.fresh();
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        let status = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    tracing::debug!(operation = operation_name, attempts, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(status) => status,
        };

        if let Some(reason) = termination_reason(&status, idempotent, retry.as_mut()) {
            let err = match reason {
                TerminationReason::ContractViolation => {
                    RetryError::contract_violation(operation_name, attempts)
                }
                _ => RetryError::new(status, reason, operation_name, attempts),
            };
            tracing::warn!(
                operation = operation_name,
                attempts,
                reason = %reason,
                code = %err.code(),
                message = err.status().message(),
                "storage call failed"
            );
            return Err(err);
        }

        let delay = backoff.on_completion();
        tracing::debug!(
            operation = operation_name,
            attempt = attempts,
            ?delay,
            code = %status.code(),
            "transient failure, backing off"
        );
        sleeper.sleep(delay).await;
    }
}

fn termination_reason(
    status: &Status,
    idempotent: bool,
    retry: &mut dyn RetryPolicy,
) -> Option<TerminationReason> {
    if status.is_ok() {
        return Some(TerminationReason::ContractViolation);
    }
    if retry.is_permanent_failure(status) {
        return Some(TerminationReason::Permanent);
    }
    if !idempotent {
        return Some(TerminationReason::NonIdempotent);
    }
    if retry.is_exhausted() || !retry.on_failure(status) {
        return Some(TerminationReason::Exhausted);
    }
    None
}

/// Configured retry loop: policy prototypes plus the sleeper.
///
/// Cheap to clone and safe to share; every [`Retrier::execute`] call gets its own policy state.
#[derive(Clone)]
pub struct Retrier {
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
    idempotency_policy: Arc<dyn IdempotencyPolicy>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for Retrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier")
            .field("retry_policy", &self.retry_policy)
            .field("backoff_policy", &self.backoff_policy)
            .field("idempotency_policy", &self.idempotency_policy)
            .field("sleeper", &"<sleeper>")
            .finish()
    }
}

impl Default for Retrier {
    fn default() -> Self {
        RetrierBuilder::new().build()
    }
}

impl Retrier {
    pub fn builder() -> RetrierBuilder {
        RetrierBuilder::new()
    }

    /// Execute `operation` for `request` with retry semantics. See [`execute`].
    pub async fn execute<R, T, Op, Fut>(&self, request: &R, operation: Op) -> Result<T, RetryError>
    where
        R: StorageRequest + ?Sized,
        Op: FnMut() -> Fut,
        Fut: Future<Output = StatusOr<T>>,
    {
        execute(
            request,
            operation,
            self.retry_policy.as_ref(),
            self.backoff_policy.as_ref(),
            self.idempotency_policy.as_ref(),
            self.sleeper.as_ref(),
        )
        .await
    }

    pub fn idempotency_policy(&self) -> &dyn IdempotencyPolicy {
        self.idempotency_policy.as_ref()
    }
}

/// Builder for [`Retrier`].
///
/// Defaults: retry for up to 15 minutes, exponential backoff from 1s to 5min with factor 2 and
/// full jitter, strict idempotency, tokio timer.
pub struct RetrierBuilder {
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
    idempotency_policy: Arc<dyn IdempotencyPolicy>,
    sleeper: Arc<dyn Sleeper>,
}

impl RetrierBuilder {
    pub fn new() -> Self {
        Self {
            retry_policy: Arc::new(LimitedTimeRetryPolicy::default()),
            backoff_policy: Arc::new(ExponentialBackoffPolicy::default()),
            idempotency_policy: Arc::new(StrictIdempotencyPolicy),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn retry_policy<P>(mut self, policy: P) -> Self
    where
        P: RetryPolicy + 'static,
    {
        self.retry_policy = Arc::new(policy);
        self
    }

    pub fn backoff_policy<P>(mut self, policy: P) -> Self
    where
        P: BackoffPolicy + 'static,
    {
        self.backoff_policy = Arc::new(policy);
        self
    }

    pub fn idempotency_policy<P>(mut self, policy: P) -> Self
    where
        P: IdempotencyPolicy + 'static,
    {
        self.idempotency_policy = Arc::new(policy);
        self
    }

    /// Share an idempotency policy that is already behind an `Arc`.
    pub fn shared_idempotency_policy(mut self, policy: Arc<dyn IdempotencyPolicy>) -> Self {
        self.idempotency_policy = policy;
        self
    }

    /// Provide a custom sleeper implementation.
    pub fn with_sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn build(self) -> Retrier {
        Retrier {
            retry_policy: self.retry_policy,
            backoff_policy: self.backoff_policy,
            idempotency_policy: self.idempotency_policy,
            sleeper: self.sleeper,
        }
    }
}

impl Default for RetrierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
