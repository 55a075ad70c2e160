//! Configuration management for Grayscaler.
//!
//! Configuration is loaded from a TOML file with sensible defaults. Every
//! section implements `Default`, so a missing file or a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Grayscaler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Upload/output directory layout
    pub storage: StorageConfig,

    /// Result cache settings
    pub cache: CacheConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.grayscaler.grayscaler/config.toml
    /// - Linux: ~/.config/grayscaler/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\grayscaler\config\config.toml
    ///
    /// Falls back to ~/.grayscaler/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "grayscaler", "grayscaler")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".grayscaler").join("config.toml")
            })
    }

    /// Resolved upload directory (with ~ expansion).
    pub fn upload_dir(&self) -> PathBuf {
        expand(&self.storage.upload_dir)
    }

    /// Resolved output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.storage.output_dir)
    }

    /// Resolved static root (with ~ expansion).
    pub fn static_dir(&self) -> PathBuf {
        expand(&self.storage.static_dir)
    }

    /// Request body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.limits.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Create the upload and output directories if they are missing.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.upload_dir())?;
        std::fs::create_dir_all(self.output_dir())?;
        Ok(())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
