//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MarqueeError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `config.toml` schema. Every field is optional; environment variables and
/// defaults fill the gaps.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Fills every unset field from `fallback`.
    pub fn or(self, fallback: ConfigFile) -> ConfigFile {
        ConfigFile {
            api_key: self.api_key.or(fallback.api_key),
            base_url: self.base_url.or(fallback.base_url),
            request_timeout_secs: self.request_timeout_secs.or(fallback.request_timeout_secs),
            log_level: self.log_level.or(fallback.log_level),
            data_dir: self.data_dir.or(fallback.data_dir),
        }
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl MarqueeConfig {
    /// Creates a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            data_dir: None,
        }
    }

    /// Resolves a merged file layer into a usable configuration.
    ///
    /// Fails with `MarqueeError::Config` when no API key is present or the
    /// timeout is zero.
    pub fn resolve(layer: ConfigFile) -> Result<Self> {
        let api_key = layer
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                MarqueeError::config(
                    "catalog API key is missing; set MARQUEE_API_KEY or api_key in config.toml",
                )
            })?;

        let request_timeout_secs = layer.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(MarqueeError::config("request_timeout_secs must be positive"));
        }

        let base_url = layer
            .base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_secs,
            log_level: layer
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            data_dir: layer.data_dir,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
