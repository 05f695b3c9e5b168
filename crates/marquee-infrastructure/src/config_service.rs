//! Configuration loading: environment over `config.toml` over defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use marquee_core::config::{ConfigFile, MarqueeConfig};
use marquee_core::error::{MarqueeError, Result};

use crate::paths::MarqueePaths;

pub const ENV_API_KEY: &str = "MARQUEE_API_KEY";
pub const ENV_TMDB_API_KEY: &str = "TMDB_API_KEY";
pub const ENV_BASE_URL: &str = "MARQUEE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MARQUEE_TIMEOUT_SECS";
pub const ENV_LOG: &str = "MARQUEE_LOG";
pub const ENV_DATA_DIR: &str = "MARQUEE_DATA_DIR";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves `MarqueeConfig` from the environment and the config file.
#[derive(Clone)]
pub struct ConfigService {
    env: EnvLookup,
    config_file: Option<PathBuf>,
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigService {
    /// Reads the process environment.
    pub fn new() -> Self {
        Self {
            env: Arc::new(|name| std::env::var(name).ok()),
            config_file: None,
        }
    }

    /// Uses `lookup` instead of the process environment.
    pub fn with_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            env: Arc::new(lookup),
            config_file: None,
        }
    }

    /// Reads `path` instead of the default `config.toml`.
    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Loads and validates the configuration.
    ///
    /// Fails with `MarqueeError::Config` when no API key is configured.
    pub fn load(&self) -> Result<MarqueeConfig> {
        let config = MarqueeConfig::resolve(self.load_layers()?)?;
        tracing::debug!(
            "Configuration loaded (base_url={}, timeout={}s)",
            config.base_url,
            config.request_timeout_secs
        );
        Ok(config)
    }

    /// Merges the environment over the config file without validating.
    ///
    /// Used for settings that do not need a catalog key (data directory,
    /// log level).
    pub fn load_layers(&self) -> Result<ConfigFile> {
        let env_layer = self.env_layer()?;
        let file_path = match &self.config_file {
            Some(path) => path.clone(),
            None => MarqueePaths::new(env_layer.data_dir.clone()).config_file()?,
        };
        let file_layer = read_config_file(&file_path)?;
        Ok(env_layer.or(file_layer))
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|value| !value.trim().is_empty())
    }

    fn env_layer(&self) -> Result<ConfigFile> {
        let request_timeout_secs = match self.var(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                MarqueeError::config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
            })?),
            None => None,
        };

        Ok(ConfigFile {
            api_key: self.var(ENV_API_KEY).or_else(|| self.var(ENV_TMDB_API_KEY)),
            base_url: self.var(ENV_BASE_URL),
            request_timeout_secs,
            log_level: self.var(ENV_LOG),
            data_dir: self.var(ENV_DATA_DIR).map(PathBuf::from),
        })
    }
}

/// Reads the TOML config file. A missing file is an empty layer.
fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        MarqueeError::config(format!("Failed to parse {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_env(env(&[]))
            .with_config_file(temp_dir.path().join("config.toml"));
        let err = service.load().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_key = \"file-key\"\nrequest_timeout_secs = 20\nlog_level = \"warn\"\n",
        )
        .unwrap();

        let service = ConfigService::with_env(env(&[(ENV_API_KEY, "env-key")]))
            .with_config_file(path);
        let config = service.load().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_tmdb_key_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_env(env(&[(ENV_TMDB_API_KEY, "tmdb")]))
            .with_config_file(temp_dir.path().join("missing.toml"));
        assert_eq!(service.load().unwrap().api_key, "tmdb");
    }

    #[test]
    fn test_data_dir_locates_config_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "api_key = \"k\"\n").unwrap();
        let data_dir = temp_dir.path().to_string_lossy().to_string();

        let service = ConfigService::with_env(env(&[(ENV_DATA_DIR, data_dir.as_str())]));
        let config = service.load().unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.data_dir.as_deref(), Some(temp_dir.path()));
    }

    #[test]
    fn test_layers_load_without_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let service = ConfigService::with_env(env(&[])).with_config_file(path);
        let layers = service.load_layers().unwrap();
        assert_eq!(layers.log_level.as_deref(), Some("debug"));
        assert!(layers.api_key.is_none());
        assert!(service.load().is_err());
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_env(env(&[
            (ENV_API_KEY, "k"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .with_config_file(temp_dir.path().join("config.toml"));
        assert!(service.load().unwrap_err().is_config());
    }

    #[test]
    fn test_malformed_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "api_key = [").unwrap();
        let service = ConfigService::with_env(env(&[])).with_config_file(path);
        assert!(service.load().unwrap_err().is_config());
    }
}
