/// Error type for Elasticsearch requests
#[derive(Debug, thiserror::Error)]
pub enum ElasticError {
    /// The cluster could not be reached or answered 503
    #[error("Elasticsearch unavailable: {0}")]
    Unavailable(String),

    /// The request did not complete within the configured timeout
    #[error("Elasticsearch request timed out: {0}")]
    Timeout(String),

    /// The cluster answered with a non-success status
    #[error("Elasticsearch returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded
    #[error("Invalid Elasticsearch response: {0}")]
    Decode(String),

    /// The client could not be built from its configuration
    #[error("Invalid Elasticsearch configuration: {0}")]
    InvalidConfig(String),

    /// Any other transport failure
    #[error("Elasticsearch transport error: {0}")]
    Transport(String),
}

impl ElasticError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ElasticError::Unavailable(_) | ElasticError::Timeout(_))
    }
}

impl From<reqwest::Error> for ElasticError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ElasticError::Timeout(e.to_string())
        } else if e.is_connect() {
            ElasticError::Unavailable(e.to_string())
        } else if e.is_decode() {
            ElasticError::Decode(e.to_string())
        } else if e.is_builder() {
            ElasticError::InvalidConfig(e.to_string())
        } else {
            ElasticError::Transport(e.to_string())
        }
    }
}
