//! Elasticsearch implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{Attributes, CreateEvent, Event, is_valid_id};
use crate::repository::EventRepository;
use async_trait::async_trait;
use database::elasticsearch::{
    ElasticClient, ElasticConfig, ElasticError, MAX_RESULT_WINDOW, Method, StatusCode,
    cluster_status, error_for_status,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

/// Writes wait until the change is visible to search, so a list right after
/// a create sees it.
const REFRESH: &str = "refresh=wait_for";

#[derive(Deserialize)]
struct GetResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Attributes>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Attributes,
}

#[derive(Deserialize)]
struct WriteResponse {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    result: String,
}

/// Elasticsearch-based event repository
///
/// Each event is one document in `index`; the document `_id` is the event
/// id and `_source` holds the attributes.
#[derive(Clone, Debug)]
pub struct ElasticEventRepository {
    client: ElasticClient,
    index: String,
    max_results: usize,
}

impl ElasticEventRepository {
    /// `max_results` is clamped to the cluster's result window.
    pub fn new(client: ElasticClient, index: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            index: index.into(),
            max_results: max_results.clamp(1, MAX_RESULT_WINDOW),
        }
    }

    pub fn from_config(client: ElasticClient, config: &ElasticConfig) -> Self {
        Self::new(client, config.index.clone(), config.max_results)
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Path of the document `id`; dot segments would be resolved away by the
    /// URL parser and address the index itself.
    fn doc_path(&self, id: &str) -> Result<String> {
        if !is_valid_id(id) {
            return Err(EventError::MalformedRequest);
        }
        Ok(format!("/{}/_doc/{}", self.index, urlencoding::encode(id)))
    }

    /// Create the index if it does not exist yet.
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn ensure_index(&self) -> Result<()> {
        let response = self
            .client
            .send(self.client.request(Method::PUT, &format!("/{}", self.index)))
            .await?;

        match error_for_status(response).await {
            Ok(_) => {
                info!("Created Elasticsearch index");
                Ok(())
            }
            Err(ElasticError::Status { status: 400, body })
                if body.contains("resource_already_exists_exception") =>
            {
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl EventRepository for ElasticEventRepository {
    #[instrument(skip(self), fields(index = %self.index))]
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Event>> {
        let response = self
            .client
            .send(self.client.request(Method::GET, &self.doc_path(id)?))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: GetResponse = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(ElasticError::from)?;

        Ok(match (body.found, body.source) {
            (true, Some(source)) => Some(Event::from_source(body.id, source)),
            _ => None,
        })
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn fetch_all(&self) -> Result<Vec<Event>> {
        let query = json!({
            "query": { "match_all": {} },
            "size": self.max_results,
        });
        let response = self
            .client
            .send(
                self.client
                    .request(Method::POST, &format!("/{}/_search", self.index))
                    .json(&query),
            )
            .await?;

        // Nothing has been stored yet.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body: SearchResponse = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(ElasticError::from)?;

        Ok(body
            .hits
            .hits
            .into_iter()
            .map(|hit| Event::from_source(hit.id, hit.source))
            .collect())
    }

    #[instrument(skip(self, event), fields(index = %self.index))]
    async fn store(&self, event: CreateEvent) -> Result<Event> {
        let request = match event.id.as_deref() {
            Some(id) => self
                .client
                .request(Method::PUT, &format!("{}?{}", self.doc_path(id)?, REFRESH)),
            None => self
                .client
                .request(Method::POST, &format!("/{}/_doc?{}", self.index, REFRESH)),
        };

        let response = self
            .client
            .send(request.json(&event.attributes))
            .await?;
        let body: WriteResponse = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(ElasticError::from)?;

        Ok(event.into_event(body.id))
    }

    #[instrument(skip(self), fields(index = %self.index))]
    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let response = self
            .client
            .send(
                self.client
                    .request(Method::DELETE, &format!("{}?{}", self.doc_path(id)?, REFRESH)),
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let body: WriteResponse = error_for_status(response)
            .await?
            .json()
            .await
            .map_err(ElasticError::from)?;

        Ok(body.result == "deleted")
    }

    async fn ping(&self) -> Result<()> {
        let status = cluster_status(&self.client).await?;
        if status.is_serving() {
            Ok(())
        } else {
            Err(EventError::BackendUnavailable(format!(
                "cluster health is {}",
                status
            )))
        }
    }
}
