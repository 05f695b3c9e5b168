//! Unified path management for marquee files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/marquee/           # Config directory
//! ├── config.toml              # Application configuration
//! └── logs/                    # Application logs
//!     └── marquee.log.YYYY-MM-DD
//!
//! ~/.local/share/marquee/      # Data directory
//! └── store.json               # Session record, favorites, recent searches
//! ```
//!
//! A base override (from `MARQUEE_DATA_DIR` or `data_dir` in config) places
//! everything under that single directory instead.

use std::path::PathBuf;

const APP_DIR: &str = "marquee";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for marquee_core::MarqueeError {
    fn from(err: PathError) -> Self {
        marquee_core::MarqueeError::config(err.to_string())
    }
}

/// Path resolution for marquee, optionally rooted at a fixed base directory.
#[derive(Debug, Clone, Default)]
pub struct MarqueePaths {
    base: Option<PathBuf>,
}

impl MarqueePaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the configuration directory (e.g. `~/.config/marquee/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/marquee/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path of the key/value store file.
    pub fn store_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
