// src/config/loader.rs
//! TOML configuration loader with path discovery

use crate::config::SessionConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file names searched, in order, in the working directory.
const CONFIG_FILE_CANDIDATES: &[&str] = &["eeg-playback.toml", "config/eeg-playback.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found in any of the search paths")]
    FileNotFound,

    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("configuration validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads and validates session configuration from disk
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader using the default discovery paths
    pub fn new() -> Self {
        Self {
            config_paths: CONFIG_FILE_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }

    /// Create a loader with explicit candidate paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
        }
    }

    /// Load the first configuration file that exists, falling back to
    /// defaults when none is present.
    pub fn load(&self) -> Result<SessionConfig, ConfigError> {
        for path in &self.config_paths {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }
        Ok(SessionConfig::default())
    }

    /// Load and validate a specific configuration file
    pub fn load_from_file(path: &Path) -> Result<SessionConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&contents)?;

        config
            .validate_consistency()
            .map_err(ConfigError::Validation)?;

        tracing::debug!(path = %path.display(), "loaded session configuration");
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
