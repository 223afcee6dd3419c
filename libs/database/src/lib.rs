//! Storage connectors and shared connection utilities.
//!
//! # Features
//!
//! - `elasticsearch` (default) - Elasticsearch REST client over `reqwest`
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::elasticsearch::{self, ElasticConfig};
//! use database::common::RetryConfig;
//!
//! let config = ElasticConfig::new("http://localhost:9200").with_index("events");
//! let client = elasticsearch::connect_from_config_with_retry(&config, Some(RetryConfig::new())).await?;
//! let status = elasticsearch::cluster_status(&client).await?;
//! ```

pub mod common;

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

pub use common::{DatabaseError, DatabaseResult};
