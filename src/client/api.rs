// src/client/api.rs
use async_trait::async_trait;

use super::{ClientError, Endpoint, HealthStatus, SearchResponse};

/// Calls the poller and the search panel make against the backend.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn health(&self, endpoint: Endpoint) -> Result<HealthStatus, ClientError>;

    async fn search_john_smith(&self) -> Result<SearchResponse, ClientError>;
}
