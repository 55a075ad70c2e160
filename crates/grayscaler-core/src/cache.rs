//! LRU cache of processed pair results with a fixed time-to-live.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::CacheConfig;
use crate::types::{CacheKey, ProcessedResult};

/// A cached result and the moment it was inserted.
#[derive(Debug, Clone)]
pub struct CachedResult {
    pub result: ProcessedResult,
    pub cached_at: Instant,
}

impl CachedResult {
    pub fn new(result: ProcessedResult) -> Self {
        Self {
            result,
            cached_at: Instant::now(),
        }
    }

    /// Whether the entry is at least `ttl` old.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() >= ttl
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Current number of entries (expired ones included until purged)
    pub size: usize,

    /// Maximum number of entries
    pub capacity: usize,

    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups that were hits.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Process-wide memo of `CacheKey → ProcessedResult`.
///
/// Safe to share between concurrent requests; all bookkeeping sits behind a
/// single async mutex.
pub struct ResultCache {
    entries: Mutex<LruCache<CacheKey, CachedResult>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` entries for `ttl` each.
    ///
    /// A zero capacity is treated as one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create a cache from the cache section of the config.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, Duration::from_secs(config.ttl_secs))
    }

    /// Look up a key.
    ///
    /// Returns `None` if absent or expired; expired entries are removed.
    /// A hit marks the entry as most recently used.
    pub async fn get(&self, key: &CacheKey) -> Option<ProcessedResult> {
        let mut entries = self.entries.lock().await;

        // peek first so an expired entry does not get promoted
        let is_expired = entries.peek(key).map(|c| c.is_expired(self.ttl));

        match is_expired {
            Some(true) => {
                entries.pop(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Some(false) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                entries.get(key).map(|c| c.result.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite an entry, evicting the least recently used one
    /// when full.
    pub async fn put(&self, key: CacheKey, result: ProcessedResult) {
        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(key.clone(), CachedResult::new(result)) {
            if evicted != key {
                tracing::debug!(key = %evicted, "Evicted cache entry");
            }
        }
    }

    /// Remove every expired entry.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.lock().await;
        let expired_keys: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, v)| v.is_expired(self.ttl))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired_keys {
            entries.pop(key);
        }
        expired_keys.len()
    }

    /// Spawn a background task that runs [`cleanup_expired`](Self::cleanup_expired)
    /// every `interval`, so entries that are never looked up again still leave.
    pub fn spawn_cleanup_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let removed = self.cleanup_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Purged expired cache entries");
                }
            }
        })
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().await;
        CacheStats {
            size: entries.len(),
            capacity: entries.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
