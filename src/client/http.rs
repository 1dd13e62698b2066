// src/client/http.rs
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn, Instrument};
use url::Url;
use uuid::Uuid;

use super::{ClientError, DirectoryApi, Endpoint, HealthStatus, SearchResponse};
use crate::config::Config;
use crate::metrics::MetricsCollector;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Thin JSON-over-HTTP wrapper around the directory backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    metrics: Option<Arc<MetricsCollector>>,
}

impl ApiClient {
    pub fn new(
        base_url: Url,
        timeout: Option<Duration>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Network)?;

        Ok(Self {
            base_url: with_trailing_slash(base_url),
            client,
            metrics,
        })
    }

    pub fn from_config(
        config: &Config,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone(), config.client.timeout(), metrics)
    }

    /// Resolve an absolute endpoint path under the base URL, keeping any
    /// path prefix the base carries.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// GET `endpoint` and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ClientError> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("directory_request", endpoint = endpoint.name(), %request_id);

        async {
            let start = Instant::now();
            let result = match self.open_with_id(endpoint, request_id).await {
                Ok(response) => match response.bytes().await {
                    Ok(body) => serde_json::from_slice::<T>(&body).map_err(ClientError::from),
                    Err(e) => Err(ClientError::Network(e)),
                },
                Err(e) => Err(e),
            };
            self.record_outcome(endpoint, &result, start.elapsed());
            result
        }
        .instrument(span)
        .await
    }

    /// GET `endpoint` and hand back the raw response once its status is
    /// known to be 2xx. Used for streamed bodies; the caller reports the
    /// outcome through [`record_outcome`](Self::record_outcome) once the
    /// body has been consumed.
    pub async fn open(&self, endpoint: Endpoint) -> Result<Response, ClientError> {
        let request_id = Uuid::new_v4();
        self.open_with_id(endpoint, request_id)
            .instrument(tracing::debug_span!("directory_request", endpoint = endpoint.name(), %request_id))
            .await
    }

    async fn open_with_id(&self, endpoint: Endpoint, request_id: Uuid) -> Result<Response, ClientError> {
        let url = self.endpoint_url(endpoint.path())?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", endpoint, e);
                ClientError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} answered with HTTP {}", endpoint, status);
            return Err(ClientError::Http { status });
        }

        debug!("{} answered with HTTP {}", endpoint, status);
        Ok(response)
    }

    /// Count one finished request and its duration.
    pub fn record_outcome<T>(&self, endpoint: Endpoint, result: &Result<T, ClientError>, elapsed: Duration) {
        if let Some(metrics) = &self.metrics {
            let outcome = match result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            metrics.record_request(endpoint.name(), outcome, elapsed);
        }
    }
}

#[async_trait]
impl DirectoryApi for ApiClient {
    async fn health(&self, endpoint: Endpoint) -> Result<HealthStatus, ClientError> {
        self.get_json(endpoint).await
    }

    async fn search_john_smith(&self) -> Result<SearchResponse, ClientError> {
        self.get_json(Endpoint::SearchJohnSmith).await
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
