//! Convenient re-exports for common storage-retry types.
pub use crate::{
    backoff::{BackoffError, BackoffPolicy, ExponentialBackoffPolicy},
    client::RetryClient,
    config::RetryConfig,
    error::{RetryError, TerminationReason},
    idempotency::{AlwaysRetryIdempotencyPolicy, IdempotencyPolicy, StrictIdempotencyPolicy},
    jitter::Jitter,
    request::{OperationKind, StorageRequest},
    retry::{Retrier, RetrierBuilder},
    retry_policy::{LimitedErrorCountRetryPolicy, LimitedTimeRetryPolicy, RetryPolicy},
    status::{Status, StatusCode, StatusOr},
    transport::Transport,
};
