use super::shutdown::shutdown_signal;
use crate::errors::handlers::not_found;
use crate::http::security::security_headers;
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Path the OpenAPI document is served from.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates the application router with the cross-cutting layers applied.
///
/// This sets up:
/// - The OpenAPI document of `T` at [`OPENAPI_PATH`]
/// - The given routes, merged at the root
/// - A plain-text 404 fallback for unknown paths
/// - Request tracing and security headers on every response
///
/// Routes are expected to carry their own state already, so the result is a
/// stateless `Router` ready to be served.
///
/// # Example
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(list_events))]
/// struct ApiDoc;
///
/// let routes = Router::new().route("/events", get(list_events)).with_state(state);
/// let router = create_router::<ApiDoc>(routes);
/// ```
pub fn create_router<T>(routes: Router) -> Router
where
    T: OpenApi + 'static,
{
    let doc = T::openapi();

    Router::new()
        .route(
            OPENAPI_PATH,
            get(move || {
                let doc = doc.clone();
                async move { Json(doc) }
            }),
        )
        .merge(routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup`.
///
/// In-flight requests are drained before `cleanup` starts. The cleanup
/// future is bounded by `shutdown_timeout`; overrunning it is logged and the
/// function returns anyway.
///
/// # Errors
/// Returns an error if the listener cannot bind to the configured address or
/// the server fails while running.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let shutdown = async {
        let reason = shutdown_signal().await;
        info!(signal = %reason, "Initiating graceful shutdown");
    };
    serve_until(listener, router, shutdown, shutdown_timeout, cleanup).await
}

/// Serves `router` on `listener` until `shutdown` resolves, then runs
/// `cleanup` bounded by `shutdown_timeout`.
pub async fn serve_until<S, F>(
    listener: tokio::net::TcpListener,
    router: Router,
    shutdown: S,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => tracing::warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test-api"))]
    struct TestDoc;

    fn app() -> Router {
        let routes = Router::new().route("/ping", get(|| async { "pong" }));
        create_router::<TestDoc>(routes)
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_not_found() {
        let response = app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Not Found");
    }

    #[tokio::test]
    async fn test_routes_are_merged_with_security_headers() {
        let response = app()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app()
            .oneshot(Request::get(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc["info"]["title"], "test-api");
    }

    async fn local_listener() -> tokio::net::TcpListener {
        tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap()
    }

    #[tokio::test]
    async fn test_serve_until_runs_cleanup_after_shutdown() {
        let cleaned = Arc::new(AtomicBool::new(false));
        let flag = cleaned.clone();

        let result = serve_until(
            local_listener().await,
            app(),
            async {},
            Duration::from_secs(1),
            async move { flag.store(true, Ordering::SeqCst) },
        )
        .await;

        assert!(result.is_ok());
        assert!(cleaned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_serve_until_bounds_slow_cleanup() {
        let started = std::time::Instant::now();

        let result = serve_until(
            local_listener().await,
            app(),
            async {},
            Duration::from_millis(20),
            tokio::time::sleep(Duration::from_secs(30)),
        )
        .await;

        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
