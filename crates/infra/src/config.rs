//! Process configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::shopify::{ShopifyConfig, DEFAULT_API_VERSION};

pub const DEFAULT_LOG_PATH: &str = "ecomsync-log.jsonl";
pub const DEFAULT_RUNNER_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON file holding the ERP documents.
    pub store_path: PathBuf,
    /// JSON-lines audit log.
    pub log_path: PathBuf,
    pub shopify: ShopifyConfig,
    /// Tick of the `watch` runner. The push itself is still gated by the
    /// frequency configured in the ERP settings.
    pub runner_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let store_path = PathBuf::from(require("ECOMSYNC_STORE_PATH")?);
        let log_path = PathBuf::from(
            get("ECOMSYNC_LOG_PATH").unwrap_or_else(|| DEFAULT_LOG_PATH.to_string()),
        );

        let timeout = parse_secs(
            "SHOPIFY_TIMEOUT_SECS",
            get("SHOPIFY_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let shopify = ShopifyConfig::new(
            require("SHOPIFY_SHOP_URL")?,
            require("SHOPIFY_ACCESS_TOKEN")?,
        )
        .with_api_version(
            get("SHOPIFY_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        )
        .with_timeout(timeout);

        let runner_interval = parse_secs(
            "ECOMSYNC_RUNNER_INTERVAL_SECS",
            get("ECOMSYNC_RUNNER_INTERVAL_SECS"),
            DEFAULT_RUNNER_INTERVAL_SECS,
        )?;

        Ok(Self {
            store_path,
            log_path,
            shopify,
            runner_interval,
        })
    }
}

fn parse_secs(
    key: &'static str,
    raw: Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };
    let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
        ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }
    })?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
