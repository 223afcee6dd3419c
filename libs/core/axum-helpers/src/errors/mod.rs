pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Response header carrying the numeric [`ErrorCode`] of a failed request.
pub const ERROR_CODE_HEADER: HeaderName = HeaderName::from_static("x-error-code");

/// Application error type that can be converted to HTTP responses.
///
/// Every variant maps to one status code and one [`ErrorCode`]. The response
/// body is the variant's message as UTF-8 plain text, so clients of text
/// endpoints see exactly the message a handler chose.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Method Not Allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gateway Timeout: {0}")]
    GatewayTimeout(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::BadRequest(_) => ErrorCode::MalformedRequest,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::MethodNotAllowed(_) => ErrorCode::MethodNotAllowed,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::BadGateway(_) => ErrorCode::BackendError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
            AppError::GatewayTimeout(_) => ErrorCode::BackendTimeout,
        }
    }

    /// Message sent to the client.
    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::InternalServerError(msg)
            | AppError::BadGateway(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::GatewayTimeout(msg) => msg,
        }
    }

    /// Emit a log line at a severity matching the error class.
    pub fn log(&self) {
        let code = self.error_code().code();
        match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg) => {
                tracing::info!(error_code = code, "{}: {}", self.status(), msg);
            }
            AppError::ServiceUnavailable(msg) | AppError::GatewayTimeout(msg) => {
                tracing::warn!(error_code = code, "{}: {}", self.status(), msg);
            }
            AppError::InternalServerError(msg) | AppError::BadGateway(msg) => {
                tracing::error!(error_code = code, "{}: {}", self.status(), msg);
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status();
        let code = HeaderValue::from(self.error_code().code());
        let body = match self {
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::InternalServerError(msg)
            | AppError::BadGateway(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::GatewayTimeout(msg) => msg,
        };

        (
            status,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                ),
                (ERROR_CODE_HEADER, code),
            ],
            body,
        )
            .into_response()
    }
}
