//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// TCP port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Directory layout for uploads and processed output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory reserved for raw uploads (created at startup)
    pub upload_dir: PathBuf,

    /// Directory processed images are written into
    pub output_dir: PathBuf,

    /// Root directory served as static content
    pub static_dir: PathBuf,

    /// URL prefix `static_dir` is mounted under
    pub static_route: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("static/uploads"),
            output_dir: PathBuf::from("static/output"),
            static_dir: PathBuf::from("static"),
            static_route: "/static".to_string(),
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live of an entry, measured from insertion
    pub ttl_secs: u64,

    /// Maximum number of entries before LRU eviction
    pub max_entries: usize,

    /// How often expired entries are swept in the background
    pub cleanup_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            max_entries: 100,
            cleanup_interval_secs: 60,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in megabytes
    pub max_upload_size_mb: u64,

    /// Per-image transform timeout in milliseconds
    pub transform_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: 25,
            transform_timeout_ms: 30000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: pretty or json
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
