//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly, `/health` and readiness checks, graceful shutdown
//! - **[`http`]**: response middleware (security headers)
//! - **[`errors`]**: [`AppError`] with status mapping and numeric error codes

pub mod errors;
pub mod http;
pub mod server;

pub use errors::{AppError, ERROR_CODE_HEADER, ErrorCode};
pub use http::security_headers;
pub use server::{
    HEALTH_BODY, HealthCheckFuture, OPENAPI_PATH, create_production_app, create_router,
    health_handler, health_router, run_health_checks,
};
