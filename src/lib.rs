#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # storage-retry
//!
//! Retry, backoff, and idempotency policies for storage operations (buckets, objects, ACLs,
//! notifications) executed over an arbitrary transport.
//!
//! ## Features
//!
//! - **Retry policies** bounded by error count or elapsed time
//! - **Exponential backoff** with a cap and optional jitter
//! - **Idempotency policies** that only retry requests that are safe to repeat
//! - **Retry loop** reporting why a call stopped (permanent, exhausted, non-idempotent)
//! - **`RetryClient`** decorating any [`Transport`], and a tower [`RetryLayer`]
//! - **Serde configuration** for all of the above
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use storage_retry::{
//!     DeleteObjectRequest, ExponentialBackoffPolicy, LimitedErrorCountRetryPolicy, Retrier,
//!     Status, StatusCode, StrictIdempotencyPolicy,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let retrier = Retrier::builder()
//!         .retry_policy(LimitedErrorCountRetryPolicy::new(3))
//!         .backoff_policy(
//!             ExponentialBackoffPolicy::new(
//!                 Duration::from_millis(1),
//!                 Duration::from_millis(8),
//!                 2.0,
//!             )
//!             .unwrap(),
//!         )
//!         .idempotency_policy(StrictIdempotencyPolicy)
//!         .build();
//!
//!     // Unconditional deletes are not safe to repeat: one attempt only.
//!     let request = DeleteObjectRequest::new("my-bucket", "my-object");
//!     let result = retrier
//!         .execute(&request, || async {
//!             Err::<(), _>(Status::new(StatusCode::Unavailable, "try again"))
//!         })
//!         .await;
//!     assert!(result.unwrap_err().is_non_idempotent());
//! }
//! ```

pub mod backoff;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod idempotency;
pub mod jitter;
pub mod layer;
pub mod metadata;
pub mod prelude;
pub mod request;
pub mod retry;
pub mod retry_policy;
pub mod sleeper;
pub mod status;
pub mod transport;

// Re-exports
pub use backoff::{BackoffError, BackoffPolicy, ExponentialBackoffPolicy};
pub use client::RetryClient;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::RetryConfig;
pub use error::{ConfigError, RetryError, TerminationReason};
pub use idempotency::{AlwaysRetryIdempotencyPolicy, IdempotencyPolicy, StrictIdempotencyPolicy};
pub use jitter::Jitter;
pub use layer::{RetryLayer, RetryService};
pub use request::*;
pub use retry::{execute, Retrier, RetrierBuilder};
pub use retry_policy::{
    is_permanent_failure, LimitedErrorCountRetryPolicy, LimitedTimeRetryPolicy, RetryPolicy,
};
pub use sleeper::{InstantSleeper, Sleeper, TokioSleeper, TrackingSleeper};
pub use status::{Status, StatusCode, StatusOr};
pub use transport::Transport;
