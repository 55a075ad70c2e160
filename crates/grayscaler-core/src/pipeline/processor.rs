//! Pair orchestration: validate → fingerprint → cache → transform → store.

use std::sync::Arc;

use crate::cache::ResultCache;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ProcessedResult, Role, UploadedImage};

use super::hash::Hasher;
use super::store::{output_filename, OutputStore};
use super::transform::Transformer;
use super::validate::Validator;

/// Processes one `(source, dest)` upload pair per call.
///
/// Calls are independent and may run concurrently; the only shared state is
/// the [`ResultCache`]. Two concurrent misses on the same key both do the
/// work and the last `put` wins.
pub struct PairProcessor {
    transformer: Transformer,
    store: OutputStore,
    cache: Arc<ResultCache>,
}

impl PairProcessor {
    /// Create a processor with the given configuration and shared cache.
    pub fn new(config: &Config, cache: Arc<ResultCache>) -> Self {
        Self {
            transformer: Transformer::new(config.limits.clone()),
            store: OutputStore::from_config(config),
            cache,
        }
    }

    /// Create a processor from explicit parts.
    pub fn with_parts(transformer: Transformer, store: OutputStore, cache: Arc<ResultCache>) -> Self {
        Self {
            transformer,
            store,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Run the full pipeline for one pair.
    ///
    /// The cache is only written after both images were transformed and
    /// stored; no failure path memoizes anything.
    pub async fn process(
        &self,
        source: UploadedImage,
        dest: UploadedImage,
    ) -> PipelineResult<ProcessedResult> {
        let start = std::time::Instant::now();
        tracing::info!(
            source = source.display_name(),
            dest = dest.display_name(),
            "Processing images"
        );

        if let Err(e) = Validator::validate_pair(&source, &dest) {
            tracing::warn!(
                source = source.display_name(),
                dest = dest.display_name(),
                "Rejected upload: {}",
                e
            );
            return Err(e.into());
        }

        let key = Hasher::cache_key(&source.bytes, &dest.bytes);

        if let Some(result) = self.cache.get(&key).await {
            tracing::info!(key = %key, "Cache hit");
            return Ok(result);
        }
        tracing::debug!(key = %key, "Cache miss");

        let source_name = source.display_name().to_string();
        let dest_name = dest.display_name().to_string();

        let transform_start = std::time::Instant::now();
        let source_png = self
            .transform(Role::Source, &source_name, source.bytes)
            .await?;
        let dest_png = self.transform(Role::Dest, &dest_name, dest.bytes).await?;
        tracing::trace!(
            elapsed_ms = transform_start.elapsed().as_millis() as u64,
            "Transformed pair"
        );

        let source_result = self.persist(Role::Source, &source_name, &source_png).await?;
        let dest_result = self.persist(Role::Dest, &dest_name, &dest_png).await?;

        let result = ProcessedResult {
            source_result,
            dest_result,
        };
        self.cache.put(key.clone(), result.clone()).await;
        tracing::info!(key = %key, "Cached result");

        tracing::debug!(
            key = %key,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Processed pair"
        );
        Ok(result)
    }

    async fn transform(&self, role: Role, filename: &str, bytes: Vec<u8>) -> PipelineResult<Vec<u8>> {
        self.transformer.to_grayscale(bytes).await.map_err(|e| {
            let err = PipelineError::from(e);
            tracing::error!(
                role = %role,
                filename,
                kind = err.kind(),
                "Image processing failed: {}",
                err
            );
            err
        })
    }

    async fn persist(&self, role: Role, filename: &str, png: &[u8]) -> PipelineResult<String> {
        let name = output_filename(role);
        match self.store.save(png, &name).await {
            Ok(path) => Ok(self.store.public_url(&path)),
            Err(e) => {
                let err = PipelineError::from(e);
                tracing::error!(
                    role = %role,
                    filename,
                    kind = err.kind(),
                    "Failed to save output: {}",
                    err
                );
                Err(err)
            }
        }
    }
}
