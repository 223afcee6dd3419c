//! Event domain error types

use axum_helpers::{AppError, ErrorCode};
use database::elasticsearch::ElasticError;
use thiserror::Error;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Event domain errors
#[derive(Debug, Error)]
pub enum EventError {
    /// Missing or empty `id` where one is required
    #[error("Malformed Request")]
    MalformedRequest,

    /// Body could not be decoded into an event
    #[error("Malformed event payload: {0}")]
    MalformedPayload(String),

    #[error("Event not found: {id}")]
    NotFound { id: String },

    #[error("Method Not Allowed")]
    UnsupportedMethod,

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend answered with an error status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A backend call exceeded its deadline
    #[error("Backend call timed out: {0}")]
    Timeout(String),
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ElasticError> for EventError {
    fn from(err: ElasticError) -> Self {
        match err {
            ElasticError::Unavailable(message) => Self::BackendUnavailable(message),
            ElasticError::Timeout(message) => Self::Timeout(message),
            ElasticError::Status { status, body } => Self::Backend {
                status,
                message: body,
            },
            ElasticError::Decode(message) => Self::Serialization(message),
            other => Self::Backend {
                status: 0,
                message: other.to_string(),
            },
        }
    }
}

// Server-side details stay in the logs; clients get a generic message.
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::MalformedRequest => {
                AppError::BadRequest(ErrorCode::MalformedRequest.default_message().to_string())
            }
            EventError::MalformedPayload(_) => AppError::BadRequest(err.to_string()),
            EventError::NotFound { .. } => AppError::NotFound("Event not found".to_string()),
            EventError::UnsupportedMethod => {
                AppError::MethodNotAllowed(ErrorCode::MethodNotAllowed.default_message().to_string())
            }
            EventError::Serialization(_) => {
                tracing::error!(error = %err, "Event serialization failed");
                AppError::InternalServerError(ErrorCode::InternalError.default_message().to_string())
            }
            EventError::Backend { .. } => {
                tracing::error!(error = %err, "Event backend request failed");
                AppError::BadGateway(ErrorCode::BackendError.default_message().to_string())
            }
            EventError::BackendUnavailable(_) => {
                tracing::warn!(error = %err, "Event backend unavailable");
                AppError::ServiceUnavailable(
                    ErrorCode::ServiceUnavailable.default_message().to_string(),
                )
            }
            EventError::Timeout(_) => {
                tracing::warn!(error = %err, "Event backend call timed out");
                AppError::GatewayTimeout(ErrorCode::BackendTimeout.default_message().to_string())
            }
        }
    }
}

impl axum::response::IntoResponse for EventError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
