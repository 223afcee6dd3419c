//! Server infrastructure: router assembly, probes and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes.merge(health_router()));
//! create_production_app(router, &config.server, config.server.shutdown_timeout(), async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{OPENAPI_PATH, create_production_app, create_router, serve_until};
pub use health::{HEALTH_BODY, HealthCheckFuture, health_handler, health_router, run_health_checks};
pub use shutdown::{ShutdownReason, shutdown_signal};
