//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.storage.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.output_dir must not be empty".into(),
            ));
        }
        let route = self.storage.static_route.trim_end_matches('/');
        if !route.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "storage.static_route must start with '/' and not be the root".into(),
            ));
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "cache.ttl_secs must be > 0".into(),
            ));
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "cache.max_entries must be > 0".into(),
            ));
        }
        if self.cache.cleanup_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "cache.cleanup_interval_secs must be > 0".into(),
            ));
        }
        if self.limits.max_upload_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_upload_size_mb must be > 0".into(),
            ));
        }
        if self.limits.transform_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.transform_timeout_ms must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(
                "logging.format must be pretty or json".into(),
            ));
        }
        Ok(())
    }
}
