// src/client/models.rs
use serde::{Deserialize, Serialize};

/// Body of `/health`, `/db-test` and `/db-health`.
///
/// Every field is optional on the wire; a missing `status` is kept as `None`
/// so the view can tell "absent" apart from any reported value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub const HEALTHY: &'static str = "healthy";

    pub fn healthy(service: &str) -> Self {
        Self {
            status: Some(Self::HEALTHY.to_string()),
            service: Some(service.to_string()),
            ..Default::default()
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some(Self::HEALTHY)
    }
}

/// Body of `/search/john-smith`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results_count: u64,
    pub execution_time_ms: f64,
}
