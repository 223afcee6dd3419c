use reqwest::Method;
use serde::Deserialize;
use std::fmt;

use super::connector::{ElasticClient, error_for_status};
use super::ElasticError;

/// Cluster health colour as reported by `/_cluster/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Green,
    Yellow,
    Red,
}

impl ClusterStatus {
    /// Green and yellow clusters serve reads and writes.
    pub fn is_serving(&self) -> bool {
        !matches!(self, ClusterStatus::Red)
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClusterStatus::Green => "green",
            ClusterStatus::Yellow => "yellow",
            ClusterStatus::Red => "red",
        };
        f.write_str(name)
    }
}

#[derive(Deserialize)]
struct ClusterHealthBody {
    status: ClusterStatus,
}

/// Fetch the cluster colour from `GET /_cluster/health`.
pub async fn cluster_status(client: &ElasticClient) -> Result<ClusterStatus, ElasticError> {
    let response = client
        .send(client.request(Method::GET, "/_cluster/health"))
        .await?;
    let body: ClusterHealthBody = error_for_status(response).await?.json().await?;
    Ok(body.status)
}
