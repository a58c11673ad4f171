//! Error types for the retry machinery
use crate::backoff::BackoffError;
use crate::{Status, StatusCode};
use std::fmt;

/// Why the retry loop stopped without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The status code is one that retrying cannot fix.
    Permanent,
    /// The error was transient but the retry policy ran out of attempts or time.
    Exhausted,
    /// The error was transient but the request is not safe to repeat.
    NonIdempotent,
    /// The transport reported a failure carrying an OK status.
    ContractViolation,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Permanent => "permanent error",
            Self::Exhausted => "retry policy exhausted",
            Self::NonIdempotent => "error in non-idempotent operation",
            Self::ContractViolation => "transport contract violation",
        };
        f.write_str(text)
    }
}

/// Terminal failure of a retried call.
///
/// `status` is the last status observed, unchanged; the termination reason, operation name, and
/// number of attempts travel alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryError {
    status: Status,
    reason: TerminationReason,
    operation: &'static str,
    attempts: usize,
}

impl RetryError {
    /// Wrap the last observed status with the reason the retry loop stopped.
    pub fn new(
        status: Status,
        reason: TerminationReason,
        operation: &'static str,
        attempts: usize,
    ) -> Self {
        Self { status, reason, operation, attempts }
    }

    /// A transport returned `Err` with an OK status. Reported as an internal error.
    pub(crate) fn contract_violation(operation: &'static str, attempts: usize) -> Self {
        let status = Status::new(
            StatusCode::Internal,
            format!("transport returned a failure with an OK status in {operation}"),
        );
        Self::new(status, TerminationReason::ContractViolation, operation, attempts)
    }

    /// The last status observed, unchanged.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Drop the retry context and keep the status.
    pub fn into_status(self) -> Status {
        self.status
    }

    /// Shorthand for `status().code()`.
    pub fn code(&self) -> StatusCode {
        self.status.code()
    }

    /// Why the retry loop stopped.
    pub fn reason(&self) -> TerminationReason {
        self.reason
    }

    /// Name of the failed operation, e.g. `GetObjectMetadata`.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Number of attempts made, including the first.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// The retry policy ran out of budget on transient failures.
    pub fn is_exhausted(&self) -> bool {
        self.reason == TerminationReason::Exhausted
    }

    /// The last failure cannot be fixed by retrying.
    pub fn is_permanent(&self) -> bool {
        self.reason == TerminationReason::Permanent
    }

    /// The request was not safe to repeat, so it was attempted once.
    pub fn is_non_idempotent(&self) -> bool {
        self.reason == TerminationReason::NonIdempotent
    }
}

impl fmt::Display for RetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} after {} attempt{}: {}",
            self.reason,
            self.operation,
            self.attempts,
            if self.attempts == 1 { "" } else { "s" },
            self.status
        )
    }
}

impl std::error::Error for RetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.status)
    }
}

impl From<RetryError> for Status {
    fn from(err: RetryError) -> Self {
        err.status
    }
}

/// Errors produced while building a retrier from configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid backoff configuration: {0}")]
    Backoff(#[from] BackoffError),
    #[error("failed to parse retry configuration: {0}")]
    Parse(String),
    #[error("failed to serialize retry configuration: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_names_reason_operation_and_status() {
        let err = RetryError::new(
            Status::new(StatusCode::Unavailable, "try-again"),
            TerminationReason::Exhausted,
            "GetObjectMetadata",
            4,
        );
        assert_eq!(
            err.to_string(),
            "retry policy exhausted in GetObjectMetadata after 4 attempts: try-again [UNAVAILABLE]"
        );
    }

    #[test]
    fn single_attempt_is_singular() {
        let err = RetryError::new(
            Status::new(StatusCode::NotFound, "nope"),
            TerminationReason::Permanent,
            "DeleteObject",
            1,
        );
        assert!(err.to_string().contains("after 1 attempt:"));
    }

    #[test]
    fn status_is_preserved_through_conversion() {
        let status = Status::new(StatusCode::DeadlineExceeded, "slow");
        let err = RetryError::new(status.clone(), TerminationReason::NonIdempotent, "x", 1);
        assert!(err.is_non_idempotent());
        assert_eq!(err.code(), StatusCode::DeadlineExceeded);
        assert_eq!(err.source().map(|s| s.to_string()), Some(status.to_string()));
        assert_eq!(Status::from(err), status);
    }

    #[test]
    fn contract_violation_is_internal() {
        let err = RetryError::contract_violation("ListBuckets", 2);
        assert_eq!(err.code(), StatusCode::Internal);
        assert_eq!(err.reason(), TerminationReason::ContractViolation);
        assert!(err.status().message().contains("ListBuckets"));
    }

    #[test]
    fn backoff_errors_convert() {
        let err: ConfigError = BackoffError::ScalingFactorTooSmall(0.5).into();
        assert!(err.to_string().contains("scaling factor"));
    }

    #[test]
    fn parse_and_serialize_errors_are_distinct() {
        let parse = ConfigError::Parse("expected value".into());
        let serialize = ConfigError::Serialize("key must be a string".into());
        assert_ne!(parse, serialize);
        assert!(parse.to_string().starts_with("failed to parse"));
        assert!(serialize.to_string().starts_with("failed to serialize"));
    }
}
