//! Application state shared across handlers.

use std::sync::Arc;

use grayscaler_core::{Config, PairProcessor, ResultCache};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub processor: Arc<PairProcessor>,
}

impl AppState {
    /// Build state with a fresh cache sized from the config.
    pub fn new(config: Config) -> Self {
        let cache = Arc::new(ResultCache::from_config(&config.cache));
        Self::with_cache(config, cache)
    }

    /// Build state around an existing cache handle.
    pub fn with_cache(config: Config, cache: Arc<ResultCache>) -> Self {
        let processor = Arc::new(PairProcessor::new(&config, cache));
        Self {
            config: Arc::new(config),
            processor,
        }
    }
}
