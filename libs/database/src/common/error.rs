/// Error raised while establishing or verifying a storage connection.
///
/// Per-request failures have their own connector-specific type; this one
/// covers the lifecycle around them.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Elasticsearch request error
    #[cfg(feature = "elasticsearch")]
    #[error("Elasticsearch error: {0}")]
    Elasticsearch(#[from] crate::elasticsearch::ElasticError),

    /// The backend answered but is not fit to serve (e.g. a red cluster)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl DatabaseError {
    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            #[cfg(feature = "elasticsearch")]
            DatabaseError::Elasticsearch(e) => e.is_transient(),
            DatabaseError::ConnectionFailed(_) => true,
        }
    }
}

/// Result type alias for connection lifecycle operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
