// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "DIRECTORY";

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "directory.yaml";

/// Load configuration from a file (YAML or JSON), then apply `DIRECTORY_*`
/// environment overrides.
pub async fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config> {
    let mut config = match path {
        Some(path) => read_config_file(path.as_ref()).await?,
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if tokio::fs::try_exists(fallback).await.unwrap_or(false) {
                read_config_file(fallback).await?
            } else {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    config.apply(read_env_overrides(ENV_PREFIX)?);
    config.validate()?;
    Ok(config)
}

async fn read_config_file(path: &Path) -> Result<Config> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let ext = path.extension().and_then(|s| s.to_str());
    let config: Config = match ext {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
        }
        _ => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
    };

    Ok(config)
}

/// Collect `<PREFIX>_BASE_URL`, `<PREFIX>_TIMEOUT_SECS` and
/// `<PREFIX>_POLL_INTERVAL_SECS`.
pub fn read_env_overrides(prefix: &str) -> Result<EnvOverrides> {
    let overrides = config::Config::builder()
        .add_source(config::Environment::with_prefix(prefix).try_parsing(true))
        .build()
        .context("Failed to read environment overrides")?
        .try_deserialize::<EnvOverrides>()
        .context("Invalid environment override")?;
    Ok(overrides)
}

/// Render the effective configuration as YAML.
pub fn to_yaml(config: &Config) -> Result<String> {
    serde_yaml::to_string(config).context("Failed to serialize config")
}
