//! Idempotency policies: is it safe to send a request more than once?
//!
//! Any request may be attempted once. Only a retry can duplicate side effects, so the retry loop
//! asks the idempotency policy a single time per call and refuses to retry requests it rejects.
//! Policies hold no state and can be shared across threads.

use crate::request::StorageRequest;
use std::fmt;

pub trait IdempotencyPolicy: Send + Sync + fmt::Debug {
    fn is_idempotent(&self, request: &dyn StorageRequest) -> bool;
}

/// Reads are idempotent; mutations only with a precondition that makes them repeatable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictIdempotencyPolicy;

impl IdempotencyPolicy for StrictIdempotencyPolicy {
    fn is_idempotent(&self, request: &dyn StorageRequest) -> bool {
        request.operation_kind().is_read_only() || request.has_idempotency_precondition()
    }
}

/// Treats every request as idempotent, for callers that accept the risk of duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysRetryIdempotencyPolicy;

impl IdempotencyPolicy for AlwaysRetryIdempotencyPolicy {
    fn is_idempotent(&self, _request: &dyn StorageRequest) -> bool {
        true
    }
}
