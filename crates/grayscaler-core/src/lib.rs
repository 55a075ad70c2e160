//! Grayscaler Core - grayscale conversion of uploaded image pairs.
//!
//! Each request carries a source and a destination image. Both are converted
//! to single-channel PNGs, written to a flat output directory, and the pair
//! of resulting locations is memoized by content fingerprint.
//!
//! # Architecture
//!
//! ```text
//! Validate → Fingerprint → Cache lookup ─hit──────────────────────→ Result
//!                                       └miss→ Transform → Store → Cache write → Result
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use grayscaler_core::{Config, PairProcessor, ResultCache, UploadedImage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let cache = Arc::new(ResultCache::from_config(&config.cache));
//!     let processor = PairProcessor::new(&config, cache);
//!
//!     let result = processor
//!         .process(
//!             UploadedImage::new("a.png", std::fs::read("a.png")?),
//!             UploadedImage::new("b.jpg", std::fs::read("b.jpg")?),
//!         )
//!         .await?;
//!     println!("{} {}", result.source_result, result.dest_result);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use cache::{CacheStats, ResultCache};
pub use config::Config;
pub use error::{
    ConfigError, InvalidInput, PipelineError, PipelineResult, ProcessingError, StorageError,
};
pub use pipeline::{Hasher, OutputStore, PairProcessor, Transformer, Validator};
pub use types::{CacheKey, Fingerprint, ProcessedResult, Role, UploadedImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
