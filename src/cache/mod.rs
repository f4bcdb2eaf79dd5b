//! Caching module for Translator-RS
//!
//! Remembers recent translate and suggest responses so repeated lookups of
//! the same text do not hit the remote provider again.

use crate::results::ResultEntry;
use moka::future::Cache;
use std::time::Duration;

/// Default cache TTL in seconds
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default maximum entries per cache
pub const DEFAULT_MAX_CAPACITY: u64 = 1000;

/// Cache for lookup responses
#[derive(Clone)]
pub struct LookupCache {
    translations: Cache<String, Vec<ResultEntry>>,
    suggestions: Cache<String, Vec<ResultEntry>>,
}

impl LookupCache {
    /// Create a new lookup cache with specified TTL
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let build = || {
            Cache::builder()
                .time_to_live(Duration::from_secs(ttl_seconds))
                .max_capacity(max_capacity)
                .build()
        };

        Self {
            translations: build(),
            suggestions: build(),
        }
    }

    /// Get cached translation entries
    pub async fn get_translation(&self, text: &str, target: &str) -> Option<Vec<ResultEntry>> {
        self.translations.get(&cache_key(text, target)).await
    }

    /// Store translation entries
    pub async fn set_translation(&self, text: &str, target: &str, entries: Vec<ResultEntry>) {
        self.translations.insert(cache_key(text, target), entries).await;
    }

    /// Get cached suggestion entries
    pub async fn get_suggestions(&self, fragment: &str) -> Option<Vec<ResultEntry>> {
        self.suggestions.get(&cache_key(fragment, "")).await
    }

    /// Store suggestion entries
    pub async fn set_suggestions(&self, fragment: &str, entries: Vec<ResultEntry>) {
        self.suggestions.insert(cache_key(fragment, ""), entries).await;
    }

    /// Clear both caches
    pub fn clear(&self) {
        self.translations.invalidate_all();
        self.suggestions.invalidate_all();
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS, DEFAULT_MAX_CAPACITY)
    }
}

/// Generate a cache key for a lookup
pub fn cache_key(text: &str, target: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update([0u8]);
    hasher.update(target.as_bytes());

    format!("{:x}", hasher.finalize())
}
