// src/health/status.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Endpoint, HealthStatus};

/// Which set of services the status poller watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StatusVariant {
    /// Backend liveness only.
    BackendOnly,
    /// Backend plus `/db-test`.
    Simple,
    /// Backend plus `/db-health`.
    #[default]
    Detailed,
}

impl StatusVariant {
    pub fn services(&self) -> Vec<MonitoredService> {
        let backend = MonitoredService::new("backend", Endpoint::Health);
        match self {
            StatusVariant::BackendOnly => vec![backend],
            StatusVariant::Simple => vec![backend, MonitoredService::new("database", Endpoint::DbTest)],
            StatusVariant::Detailed => vec![backend, MonitoredService::new("database", Endpoint::DbHealth)],
        }
    }

    /// The detailed variant also shows `database`/`message` fields.
    pub fn shows_details(&self) -> bool {
        matches!(self, StatusVariant::Detailed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitoredService {
    pub name: &'static str,
    pub endpoint: Endpoint,
}

impl MonitoredService {
    pub const fn new(name: &'static str, endpoint: Endpoint) -> Self {
        Self { name, endpoint }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckState {
    Checking,
    Reported(HealthStatus),
    Failed(String),
}

impl CheckState {
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckState::Reported(status) if status.is_healthy())
    }
}

/// Point-in-time view of one monitored service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSnapshot {
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub state: CheckState,
    pub checked_at: Option<DateTime<Utc>>,
}
