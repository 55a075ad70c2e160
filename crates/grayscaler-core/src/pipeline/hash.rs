//! Content fingerprinting for cache keys.

use sha2::{Digest, Sha256};

use crate::types::{CacheKey, Fingerprint};

/// Provides SHA-256 content fingerprints.
pub struct Hasher;

impl Hasher {
    /// Generate a SHA-256 fingerprint from an in-memory byte buffer.
    pub fn fingerprint(data: &[u8]) -> Fingerprint {
        let digest = Sha256::digest(data);
        Fingerprint::from_hex(hex::encode(digest))
    }

    /// Build the cache key for a source/dest pair, in that order.
    pub fn cache_key(source: &[u8], dest: &[u8]) -> CacheKey {
        CacheKey::new(&Self::fingerprint(source), &Self::fingerprint(dest))
    }
}
