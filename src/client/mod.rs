// src/client/mod.rs
mod api;
mod endpoint;
mod error;
mod http;
mod models;

pub use api::DirectoryApi;
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use http::{ApiClient, REQUEST_ID_HEADER};
pub use models::{HealthStatus, SearchResponse};
