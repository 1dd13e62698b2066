// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::health::StatusVariant;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Request timeout; `None` leaves it to the transport.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub variant: StatusVariant,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Values picked up from `DIRECTORY_*` environment variables.
#[derive(Debug, Default, Deserialize)]
pub struct EnvOverrides {
    pub base_url: Option<Url>,
    pub timeout_secs: Option<u64>,
    pub poll_interval_secs: Option<u64>,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

fn default_poll_interval() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client: ClientConfig::default(),
            status: StatusConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            variant: StatusVariant::default(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl StatusConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Config {
    pub fn apply(&mut self, overrides: EnvOverrides) {
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.client.timeout_secs = Some(secs);
        }
        if let Some(secs) = overrides.poll_interval_secs {
            self.status.poll_interval_secs = secs;
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            other => bail!("base_url must use http or https, got '{}'", other),
        }
        if self.base_url.cannot_be_a_base() {
            bail!("base_url '{}' cannot be used as a base", self.base_url);
        }
        if self.status.poll_interval_secs == 0 {
            bail!("status.poll_interval_secs must be greater than zero");
        }
        if self.client.timeout_secs == Some(0) {
            bail!("client.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
