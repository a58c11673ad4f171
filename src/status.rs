//! Status model shared by every component.
//!
//! A [`Status`] reports the outcome of one remote call: a [`StatusCode`] plus a human-readable
//! message. Successful calls carry [`StatusCode::Ok`] and, by convention, an empty message.
//! Operations return [`StatusOr<T>`], which is either the payload or a failed `Status`.
//!
//! Example
//! ```rust
//! use storage_retry::{Status, StatusCode};
//!
//! let status = Status::new(StatusCode::Unavailable, "try again");
//! assert!(!status.is_ok());
//! assert_eq!(status.to_string(), "try again [UNAVAILABLE]");
//! assert!(Status::default().is_ok());
//! ```

use std::fmt;

/// Well-known remote-call outcomes. Discriminants match the gRPC status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum StatusCode {
    /// Not an error; returned on success.
    #[default]
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl StatusCode {
    /// Canonical upper-snake-case name, e.g. `UNAVAILABLE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Cancelled => "CANCELLED",
            StatusCode::Unknown => "UNKNOWN",
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::AlreadyExists => "ALREADY_EXISTS",
            StatusCode::PermissionDenied => "PERMISSION_DENIED",
            StatusCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            StatusCode::FailedPrecondition => "FAILED_PRECONDITION",
            StatusCode::Aborted => "ABORTED",
            StatusCode::OutOfRange => "OUT_OF_RANGE",
            StatusCode::Unimplemented => "UNIMPLEMENTED",
            StatusCode::Internal => "INTERNAL",
            StatusCode::Unavailable => "UNAVAILABLE",
            StatusCode::DataLoss => "DATA_LOSS",
            StatusCode::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    /// Numeric value of the code.
    pub fn value(&self) -> i32 {
        *self as i32
    }

    /// Map a numeric value back to a code. Unrecognized values map to `Unknown`.
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => StatusCode::Ok,
            1 => StatusCode::Cancelled,
            3 => StatusCode::InvalidArgument,
            4 => StatusCode::DeadlineExceeded,
            5 => StatusCode::NotFound,
            6 => StatusCode::AlreadyExists,
            7 => StatusCode::PermissionDenied,
            8 => StatusCode::ResourceExhausted,
            9 => StatusCode::FailedPrecondition,
            10 => StatusCode::Aborted,
            11 => StatusCode::OutOfRange,
            12 => StatusCode::Unimplemented,
            13 => StatusCode::Internal,
            14 => StatusCode::Unavailable,
            15 => StatusCode::DataLoss,
            16 => StatusCode::Unauthenticated,
            _ => StatusCode::Unknown,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error code and details from a remote request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    /// Build a status from a code and a human-readable message.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// True iff the code is [`StatusCode::Ok`].
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }

    /// The canonical error code.
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// Details reported by the service; may be empty.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)
    }
}

impl std::error::Error for Status {}

/// Either a value of type `T` or the `Status` describing why there is none.
pub type StatusOr<T> = Result<T, Status>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_ok_with_empty_message() {
        let status = Status::default();
        assert!(status.is_ok());
        assert_eq!(status.code(), StatusCode::Ok);
        assert!(status.message().is_empty());
    }

    #[test]
    fn equality_compares_code_and_message() {
        let a = Status::new(StatusCode::NotFound, "missing");
        assert_eq!(a, Status::new(StatusCode::NotFound, "missing"));
        assert_ne!(a, Status::new(StatusCode::NotFound, "gone"));
        assert_ne!(a, Status::new(StatusCode::Unavailable, "missing"));
    }

    #[test]
    fn display_includes_message_and_code_name() {
        let status = Status::new(StatusCode::PermissionDenied, "no access");
        assert_eq!(status.to_string(), "no access [PERMISSION_DENIED]");
    }

    #[test]
    fn numeric_values_follow_grpc() {
        assert_eq!(StatusCode::Ok.value(), 0);
        assert_eq!(StatusCode::ResourceExhausted.value(), 8);
        assert_eq!(StatusCode::Unauthenticated.value(), 16);
        for value in 0..=16 {
            assert_eq!(StatusCode::from_value(value).value(), value);
        }
        assert_eq!(StatusCode::from_value(-1), StatusCode::Unknown);
        assert_eq!(StatusCode::from_value(99), StatusCode::Unknown);
    }
}
