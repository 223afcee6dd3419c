use axum::Router;
use axum_helpers::server::{create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::{ElasticEventRepository, EventRepository, MemoryEventRepository};
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);
    info!(
        backend = ?config.events.backend,
        "Starting {} v{}", config.app.name, config.app.version
    );

    match config.elasticsearch.clone() {
        Some(es) => {
            info!("Connecting to Elasticsearch at {}", es.base_url());
            let client =
                database::elasticsearch::connect_from_config_with_retry(&es, None).await?;
            let repository = ElasticEventRepository::from_config(client, &es);
            api::events::init_index(&repository).await?;

            serve(AppState::new(config, repository)).await
        }
        None => {
            warn!("Using in-memory event storage; events are lost on restart");
            serve(AppState::new(config, MemoryEventRepository::new())).await
        }
    }
}

/// Full application router: API routes, probes, docs and fallbacks.
fn build_app<R: EventRepository + 'static>(state: &AppState<R>) -> Router {
    create_router::<openapi::ApiDoc>(api::routes(state))
}

async fn serve<R: EventRepository + 'static>(state: AppState<R>) -> eyre::Result<()> {
    let app = build_app(&state);
    let server = state.config.server.clone();

    create_production_app(app, &server, server.shutdown_timeout(), async move {
        info!("Shutting down: releasing event backend");
        drop(state);
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Events API shutdown complete");
    Ok(())
}
