//! API routes module

pub mod events;
pub mod health;

use axum::Router;
use domain_events::EventRepository;

use crate::state::AppState;

/// Create all application routes; `create_router` adds docs and the 404 fallback.
pub fn routes<R: EventRepository + 'static>(state: &AppState<R>) -> Router {
    Router::new()
        .merge(events::router(state))
        .merge(health::router(state.clone()))
}
