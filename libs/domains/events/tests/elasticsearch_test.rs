//! ElasticEventRepository against a fake Elasticsearch served by axum
//!
//! The fake implements just the document, search, index and cluster health
//! endpoints the repository calls, with Elasticsearch's reply shapes.

use axum::body::Body;
use axum::extract::{Path, RawQuery, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use database::elasticsearch::{ElasticClient, ElasticConfig};
use domain_events::*;
use http_body_util::BodyExt;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct Cluster {
    health: String,
    index_exists: bool,
    docs: BTreeMap<String, Map<String, Value>>,
    next_id: u32,
    write_queries: Vec<String>,
    /// `"<METHOD> <path?query>"` of every request received, as sent on the wire
    requests: Vec<String>,
}

type Shared = Arc<Mutex<Cluster>>;

fn index_missing() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": {"type": "index_not_found_exception"}, "status": 404})),
    )
        .into_response()
}

async fn record(
    State(cluster): State<Shared>,
    request: axum::extract::Request,
    next: Next,
) -> axum::response::Response {
    let line = format!("{} {}", request.method(), request.uri());
    cluster.lock().unwrap().requests.push(line);
    next.run(request).await
}

async fn cluster_health(State(cluster): State<Shared>) -> Json<Value> {
    let health = cluster.lock().unwrap().health.clone();
    Json(json!({"cluster_name": "fake", "status": health}))
}

async fn create_index(State(cluster): State<Shared>) -> axum::response::Response {
    let mut cluster = cluster.lock().unwrap();
    if cluster.index_exists {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"type": "resource_already_exists_exception"}, "status": 400})),
        )
            .into_response();
    }
    cluster.index_exists = true;
    Json(json!({"acknowledged": true})).into_response()
}

async fn get_doc(
    State(cluster): State<Shared>,
    Path((index, id)): Path<(String, String)>,
) -> axum::response::Response {
    let cluster = cluster.lock().unwrap();
    if !cluster.index_exists {
        return index_missing();
    }
    match cluster.docs.get(&id) {
        Some(source) => Json(json!({
            "_index": index, "_id": id, "found": true, "_source": source
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"_index": index, "_id": id, "found": false})),
        )
            .into_response(),
    }
}

fn write_doc(
    cluster: &mut Cluster,
    id: String,
    query: Option<String>,
    source: Map<String, Value>,
) -> axum::response::Response {
    cluster.index_exists = true;
    cluster.write_queries.push(query.unwrap_or_default());
    let result = if cluster.docs.insert(id.clone(), source).is_some() {
        "updated"
    } else {
        "created"
    };
    (
        StatusCode::CREATED,
        Json(json!({"_id": id, "result": result})),
    )
        .into_response()
}

async fn put_doc(
    State(cluster): State<Shared>,
    Path((_index, id)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    Json(source): Json<Map<String, Value>>,
) -> axum::response::Response {
    write_doc(&mut cluster.lock().unwrap(), id, query, source)
}

async fn post_doc(
    State(cluster): State<Shared>,
    RawQuery(query): RawQuery,
    Json(source): Json<Map<String, Value>>,
) -> axum::response::Response {
    let mut cluster = cluster.lock().unwrap();
    cluster.next_id += 1;
    let id = format!("generated-{}", cluster.next_id);
    write_doc(&mut cluster, id, query, source)
}

async fn delete_doc(
    State(cluster): State<Shared>,
    Path((_index, id)): Path<(String, String)>,
) -> axum::response::Response {
    let mut cluster = cluster.lock().unwrap();
    if !cluster.index_exists {
        return index_missing();
    }
    match cluster.docs.remove(&id) {
        Some(_) => Json(json!({"_id": id, "result": "deleted"})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"_id": id, "result": "not_found"})),
        )
            .into_response(),
    }
}

async fn search(State(cluster): State<Shared>, Json(query): Json<Value>) -> axum::response::Response {
    let cluster = cluster.lock().unwrap();
    if !cluster.index_exists {
        return index_missing();
    }
    let size = query["size"].as_u64().unwrap_or(10) as usize;
    let hits: Vec<Value> = cluster
        .docs
        .iter()
        .take(size)
        .map(|(id, source)| json!({"_id": id, "_source": source}))
        .collect();
    Json(json!({"hits": {"total": {"value": hits.len()}, "hits": hits}})).into_response()
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{}", addr)
}

async fn fake_cluster() -> (Shared, ElasticEventRepository) {
    let cluster: Shared = Arc::new(Mutex::new(Cluster {
        health: "green".to_string(),
        ..Default::default()
    }));
    let router = Router::new()
        .route("/_cluster/health", get(cluster_health))
        .route("/{index}", put(create_index))
        .route("/{index}/_doc", post(post_doc))
        .route("/{index}/_doc/{id}", get(get_doc).put(put_doc).delete(delete_doc))
        .route("/{index}/_search", post(search))
        .layer(middleware::from_fn_with_state(cluster.clone(), record))
        .with_state(cluster.clone());

    let url = spawn(router).await;
    let config = ElasticConfig::new(url).with_index("events").with_max_results(100);
    let client = ElasticClient::new(&config).unwrap();
    (cluster, ElasticEventRepository::from_config(client, &config))
}

fn payload(value: Value) -> CreateEvent {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_missing_index_reads_as_empty() {
    let (_, repo) = fake_cluster().await;

    assert!(repo.fetch_all().await.unwrap().is_empty());
    assert_eq!(repo.fetch_by_id("e-1").await.unwrap(), None);
    assert!(!repo.delete_by_id("e-1").await.unwrap());
}

#[tokio::test]
async fn test_ensure_index_is_idempotent() {
    let (cluster, repo) = fake_cluster().await;

    repo.ensure_index().await.unwrap();
    repo.ensure_index().await.unwrap();

    assert!(cluster.lock().unwrap().index_exists);
}

#[tokio::test]
async fn test_store_without_id_uses_generated_id() {
    let (cluster, repo) = fake_cluster().await;

    let stored = repo
        .store(payload(json!({"name": "concert", "lat": 40.0})))
        .await
        .unwrap();

    assert_eq!(stored.id, "generated-1");
    let cluster = cluster.lock().unwrap();
    assert_eq!(cluster.docs["generated-1"], *json!({"name": "concert", "lat": 40.0}).as_object().unwrap());
    assert_eq!(cluster.write_queries, ["refresh=wait_for"]);
}

#[tokio::test]
async fn test_store_with_id_round_trips_through_fetch() {
    let (_, repo) = fake_cluster().await;

    let stored = repo
        .store(payload(json!({"id": "summer fest", "name": "concert"})))
        .await
        .unwrap();
    assert_eq!(stored.id, "summer fest");

    let fetched = repo.fetch_by_id("summer fest").await.unwrap().unwrap();
    assert_eq!(fetched, stored);
    assert_eq!(
        serde_json::to_value(&fetched).unwrap(),
        json!({"id": "summer fest", "name": "concert"})
    );
}

#[tokio::test]
async fn test_fetch_all_and_delete() {
    let (_, repo) = fake_cluster().await;
    repo.store(payload(json!({"id": "a", "n": 1}))).await.unwrap();
    repo.store(payload(json!({"id": "b", "n": 2}))).await.unwrap();

    let ids: Vec<String> = repo
        .fetch_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, ["a", "b"]);

    assert!(repo.delete_by_id("a").await.unwrap());
    assert!(!repo.delete_by_id("a").await.unwrap());
    assert_eq!(repo.fetch_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ping_follows_cluster_colour() {
    let (cluster, repo) = fake_cluster().await;
    assert!(repo.ping().await.is_ok());

    cluster.lock().unwrap().health = "yellow".to_string();
    assert!(repo.ping().await.is_ok());

    cluster.lock().unwrap().health = "red".to_string();
    assert!(matches!(
        repo.ping().await,
        Err(EventError::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let router = Router::new()
        .route(
            "/busy/_search",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        )
        .route(
            "/broken/_search",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "shard failure") }),
        );
    let url = spawn(router).await;
    let client = ElasticClient::new(&ElasticConfig::new(url)).unwrap();

    let busy = ElasticEventRepository::new(client.clone(), "busy", 10);
    assert!(matches!(
        busy.fetch_all().await,
        Err(EventError::BackendUnavailable(_))
    ));

    let broken = ElasticEventRepository::new(client, "broken", 10);
    assert!(matches!(
        broken.fetch_all().await,
        Err(EventError::Backend { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_cluster_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = ElasticClient::new(&ElasticConfig::new(url)).unwrap();
    let repo = ElasticEventRepository::new(client, "events", 10);

    assert!(matches!(
        repo.fetch_by_id("e-1").await,
        Err(EventError::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn test_reserved_characters_stay_inside_the_document_path() {
    let (cluster, repo) = fake_cluster().await;
    let cases = [
        ("a/b", "a%2Fb"),
        ("what?", "what%3F"),
        ("#1", "%231"),
        ("summer fest", "summer%20fest"),
        ("...", "..."),
        ("../up", "..%2Fup"),
    ];

    for (id, encoded) in cases {
        let stored = repo
            .store(payload(json!({"id": id, "name": "concert"})))
            .await
            .unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(repo.fetch_by_id(id).await.unwrap(), Some(stored));
        assert!(repo.delete_by_id(id).await.unwrap());

        let requests = cluster.lock().unwrap().requests.clone();
        let doc = format!("/events/_doc/{}", encoded);
        assert!(requests.contains(&format!("PUT {}?refresh=wait_for", doc)), "{:?}", requests);
        assert!(requests.contains(&format!("GET {}", doc)), "{:?}", requests);
        assert!(requests.contains(&format!("DELETE {}?refresh=wait_for", doc)), "{:?}", requests);
    }

    assert!(cluster.lock().unwrap().docs.is_empty());
}

#[tokio::test]
async fn test_dot_segment_ids_never_reach_the_cluster() {
    let (cluster, repo) = fake_cluster().await;

    for id in [".", ".."] {
        assert!(matches!(
            repo.fetch_by_id(id).await,
            Err(EventError::MalformedRequest)
        ));
        assert!(matches!(
            repo.delete_by_id(id).await,
            Err(EventError::MalformedRequest)
        ));
        assert!(matches!(
            repo.store(payload(json!({"id": id}))).await,
            Err(EventError::MalformedRequest)
        ));
    }

    assert!(cluster.lock().unwrap().requests.is_empty());
}

#[tokio::test]
async fn test_router_refuses_dot_segment_ids_before_the_cluster() {
    let (cluster, repo) = fake_cluster().await;
    repo.store(payload(json!({"id": "keep", "name": "concert"})))
        .await
        .unwrap();
    let app = events_router(Arc::new(EventManager::new(repo)));
    let seen_before = cluster.lock().unwrap().requests.len();

    let requests = [
        Request::delete("/events?id=..").body(Body::empty()).unwrap(),
        Request::delete("/events?id=%2E").body(Body::empty()).unwrap(),
        Request::get("/events?id=.").body(Body::empty()).unwrap(),
        Request::post("/events")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"id":"..","name":"concert"}"#))
            .unwrap(),
    ];
    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"Malformed"));
    }

    let cluster = cluster.lock().unwrap();
    assert_eq!(cluster.requests.len(), seen_before);
    assert!(cluster.docs.contains_key("keep"));
}
