//! Events API routes

use axum::Router;
use domain_events::{ElasticEventRepository, EventRepository};
use tracing::info;

use crate::state::AppState;

/// Create the events router over the shared manager
pub fn router<R: EventRepository + 'static>(state: &AppState<R>) -> Router {
    domain_events::events_router(state.events.clone())
}

/// Make sure the Elasticsearch index exists before serving
pub async fn init_index(repository: &ElasticEventRepository) -> eyre::Result<()> {
    repository
        .ensure_index()
        .await
        .map_err(|e| eyre::eyre!("Failed to create events index: {}", e))?;
    info!(index = repository.index(), "Events index ready");
    Ok(())
}
