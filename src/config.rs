//! Configuration for the verifier.

use crate::store::{CacheConfig, RemoteConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Root directory for locally cached documents.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Remote document service settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            remote: RemoteConfig::default(),
            cache: CacheConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "veridoc")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".veridoc"))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl VerifierConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
