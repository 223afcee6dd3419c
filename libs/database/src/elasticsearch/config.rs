#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Elasticsearch's default `index.max_result_window`; a search asking for
/// more hits than this is rejected by the cluster.
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Elasticsearch connection settings.
///
/// Constructed manually or loaded from environment variables (with the
/// `config` feature).
///
/// ```ignore
/// let config = ElasticConfig::new("http://localhost:9200")
///     .with_index("events")
///     .with_credentials("elastic", "changeme");
/// ```
#[derive(Clone, Debug)]
pub struct ElasticConfig {
    /// Base URL of the cluster, e.g. `http://localhost:9200`
    pub url: String,

    /// Index that holds the documents
    pub index: String,

    /// Basic auth user name
    pub username: Option<String>,

    /// Basic auth password
    pub password: Option<String>,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,

    /// `size` used when listing all documents, at most [`MAX_RESULT_WINDOW`]
    pub max_results: usize,
}

impl ElasticConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Listing size, clamped to `1..=MAX_RESULT_WINDOW`.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULT_WINDOW);
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "events".to_string(),
            username: None,
            password: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_results: MAX_RESULT_WINDOW,
        }
    }
}

/// Load ElasticConfig from environment variables
///
/// Environment variables:
/// - `ELASTICSEARCH_URL` (required)
/// - `ELASTICSEARCH_INDEX` (optional, default: events)
/// - `ELASTICSEARCH_USERNAME` / `ELASTICSEARCH_PASSWORD` (optional, both or neither)
/// - `ELASTICSEARCH_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `ELASTICSEARCH_REQUEST_TIMEOUT_SECS` (optional, default: 30)
/// - `ELASTICSEARCH_MAX_RESULTS` (optional, 1 to 10000, default: 10000)
#[cfg(feature = "config")]
impl FromEnv for ElasticConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = core_config::env_required("ELASTICSEARCH_URL")?;
        let index = core_config::env_or_default("ELASTICSEARCH_INDEX", "events");

        let username = std::env::var("ELASTICSEARCH_USERNAME").ok();
        let password = std::env::var("ELASTICSEARCH_PASSWORD").ok();
        if username.is_some() != password.is_some() {
            return Err(ConfigError::InvalidValue {
                key: "ELASTICSEARCH_USERNAME".to_string(),
                details: "username and password must be set together".to_string(),
            });
        }

        let max_results = env_parse("ELASTICSEARCH_MAX_RESULTS", MAX_RESULT_WINDOW)?;
        if !(1..=MAX_RESULT_WINDOW).contains(&max_results) {
            return Err(ConfigError::InvalidValue {
                key: "ELASTICSEARCH_MAX_RESULTS".to_string(),
                details: format!("must be between 1 and {}", MAX_RESULT_WINDOW),
            });
        }

        Ok(Self {
            url,
            index,
            username,
            password,
            connect_timeout_secs: env_parse("ELASTICSEARCH_CONNECT_TIMEOUT_SECS", 10)?,
            request_timeout_secs: env_parse("ELASTICSEARCH_REQUEST_TIMEOUT_SECS", 30)?,
            max_results,
        })
    }
}
