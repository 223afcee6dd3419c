//! Elasticsearch connector over the REST API
//!
//! Provides a thin authenticated HTTP client, connection verification with
//! retry, and cluster health checks.

mod config;
mod connector;
mod error;
mod health;

pub use config::{ElasticConfig, MAX_RESULT_WINDOW};
pub use connector::{
    ElasticClient, connect_from_config, connect_from_config_with_retry, error_for_status,
};
pub use error::ElasticError;
pub use health::{ClusterStatus, cluster_status};

// Re-export reqwest types used in the client API
pub use reqwest::{Method, StatusCode};
