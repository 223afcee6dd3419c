//! Liveness and readiness endpoints

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, health_router, run_health_checks};
use domain_events::EventRepository;
use serde_json::Value;

use crate::state::AppState;

/// `/health` never touches the backend; `/ready` pings it.
pub fn router<R: EventRepository + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/ready", get(readiness_check::<R>))
        .with_state(state)
        .merge(health_router())
}

/// Readiness check - verifies the event backend answers
async fn readiness_check<R: EventRepository + 'static>(
    State(state): State<AppState<R>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let backend: HealthCheckFuture<'_> =
        Box::pin(async { state.events.ping().await.map_err(|e| e.to_string()) });

    run_health_checks(state.config.app, vec![("backend", backend)]).await
}
