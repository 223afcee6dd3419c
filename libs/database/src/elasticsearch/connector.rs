use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::info;

use super::health::{ClusterStatus, cluster_status};
use super::{ElasticConfig, ElasticError};
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_if};

/// Shared handle to an Elasticsearch cluster.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections and is
/// safe to use from many tasks at once.
#[derive(Clone)]
pub struct ElasticClient {
    http: Client,
    base_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl ElasticClient {
    /// Build a client without contacting the cluster.
    pub fn new(config: &ElasticConfig) -> Result<Self, ElasticError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request to `path` (which must begin with `/`), with auth applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, password.as_deref()),
            None => builder,
        }
    }

    /// Send a prepared request, mapping transport failures to [`ElasticError`].
    ///
    /// The response is returned whatever its status; use [`error_for_status`]
    /// where only success is acceptable.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ElasticError> {
        Ok(request.send().await?)
    }
}

impl fmt::Debug for ElasticClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

/// Turn a non-success reply into an [`ElasticError`].
///
/// A 503 becomes [`ElasticError::Unavailable`]; any other failure status
/// keeps its code and body in [`ElasticError::Status`].
pub async fn error_for_status(response: Response) -> Result<Response, ElasticError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::SERVICE_UNAVAILABLE {
        Err(ElasticError::Unavailable(body))
    } else {
        Err(ElasticError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Connect using an [`ElasticConfig`] and verify the cluster answers.
///
/// A cluster in `red` state counts as a failed connection.
pub async fn connect_from_config(config: &ElasticConfig) -> DatabaseResult<ElasticClient> {
    let client = ElasticClient::new(config)?;
    info!("Attempting to connect to Elasticsearch at {}", client.base_url());

    match cluster_status(&client).await? {
        ClusterStatus::Red => Err(DatabaseError::ConnectionFailed(
            "cluster health is red".to_string(),
        )),
        status => {
            info!(cluster_status = %status, "Successfully connected to Elasticsearch");
            Ok(client)
        }
    }
}

/// Connect from config with automatic retry on transient failures.
///
/// Configuration and authentication errors are returned at once. Without a
/// `retry_config` the [`RetryConfig::default`] policy applies.
pub async fn connect_from_config_with_retry(
    config: &ElasticConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<ElasticClient> {
    retry_if(
        || connect_from_config(config),
        retry_config.unwrap_or_default(),
        DatabaseError::is_transient,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn closed_port_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = ElasticClient::new(&ElasticConfig::new("http://es:9200/")).unwrap();
        assert_eq!(client.base_url(), "http://es:9200");
    }

    #[test]
    fn test_request_applies_basic_auth() {
        let config = ElasticConfig::new("http://es:9200").with_credentials("elastic", "secret");
        let client = ElasticClient::new(&config).unwrap();

        let request = client.request(Method::GET, "/_cluster/health").build().unwrap();

        assert_eq!(request.url().as_str(), "http://es:9200/_cluster/health");
        assert!(request.headers().contains_key(reqwest::header::AUTHORIZATION));
        assert!(!format!("{:?}", client).contains("secret"));
    }

    #[tokio::test]
    async fn test_connect_refused_is_unavailable() {
        let url = closed_port_url().await;

        let result = connect_from_config(&ElasticConfig::new(url)).await;

        assert!(matches!(
            result,
            Err(DatabaseError::Elasticsearch(ElasticError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up() {
        let url = closed_port_url().await;
        let policy = RetryConfig::new()
            .with_max_retries(1)
            .with_initial_delay(Duration::from_millis(5))
            .without_jitter();

        let result = connect_from_config_with_retry(&ElasticConfig::new(url), Some(policy)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires a running Elasticsearch
    async fn test_connect_live() {
        let url = std::env::var("ELASTICSEARCH_URL")
            .unwrap_or_else(|_| "http://localhost:9200".to_string());
        assert!(connect_from_config(&ElasticConfig::new(url)).await.is_ok());
    }
}
