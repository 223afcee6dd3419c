//! Type-safe error codes for API responses.
//!
//! Each error code includes:
//! - String representation (e.g., "MALFORMED_REQUEST")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - Default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::MalformedRequest;
//! assert_eq!(code.as_str(), "MALFORMED_REQUEST");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Malformed Request");
//! ```

use serde::{Deserialize, Serialize};

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request is missing a parameter or has an unreadable body
    MalformedRequest,

    /// Requested resource was not found
    NotFound,

    /// HTTP method is not supported on this resource
    MethodNotAllowed,

    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Backend errors (2000-2999)
    /// The storage backend answered with an error
    BackendError,

    /// The storage backend did not answer in time
    BackendTimeout,
}

impl ErrorCode {
    /// Get the string representation for client consumption.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::BackendError => "BACKEND_ERROR",
            Self::BackendTimeout => "BACKEND_TIMEOUT",
        }
    }

    /// Get the integer code for logging and monitoring.
    ///
    /// Ranges:
    /// - 1000-1999: Client and generic server errors
    /// - 2000-2999: Storage backend errors
    pub fn code(&self) -> i32 {
        match self {
            Self::MalformedRequest => 1001,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::MethodNotAllowed => 1006,
            Self::ServiceUnavailable => 1011,

            Self::BackendError => 2003,
            Self::BackendTimeout => 2013,
        }
    }

    /// Get the default user-facing error message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "Malformed Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::BackendError => "Storage backend returned an error",
            Self::BackendTimeout => "Storage backend timed out",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
