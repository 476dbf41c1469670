//! Moka in-memory cache implementation
//!
//! Thread-safe in-memory cache with two expiry thresholds. Each entry carries
//! its own soft deadline, set from the TTL passed to `set_bytes`; reads past
//! that deadline are misses and drop the entry. The cache-wide hard TTL is
//! moka's `time_to_live`, after which moka evicts the entry regardless.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats},
};
use async_trait::async_trait;
use moka::{
    future::Cache,
    ops::compute::{CompResult, Op},
};
use tracing::{debug, instrument};

/// Configuration for Moka cache
#[derive(Debug, Clone, Copy)]
pub struct MokaCacheConfig {
    /// Maximum number of entries
    pub max_entries: u64,
    /// Hard TTL after which entries are evicted regardless of their soft TTL
    pub hard_ttl: Duration,
}

impl Default for MokaCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            hard_ttl: Duration::from_secs(48 * 60 * 60), // 48 hours
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Moka-based in-memory cache
pub struct MokaCache {
    cache: Cache<String, Entry>,
    hard_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entries", &self.cache.entry_count())
            .field("hard_ttl", &self.hard_ttl)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MokaCache {
    /// Create a new Moka cache with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MokaCacheConfig::default())
    }

    /// Create a new Moka cache with custom configuration
    #[must_use]
    pub fn with_config(config: MokaCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.hard_ttl)
            .build();

        Self {
            cache,
            hard_ttl: config.hard_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Remove entries past their soft deadline and run moka's pending
    /// maintenance; returns how many soft-expired entries were dropped
    #[instrument(skip(self), level = "debug")]
    pub async fn sweep(&self) -> u64 {
        let now = Instant::now();
        let expired: Vec<String> = self
            .cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| (*key).clone())
            .collect();

        let mut removed = 0u64;
        for key in expired {
            if self.remove_if_expired(&key, now).await {
                removed += 1;
            }
        }

        self.cache.run_pending_tasks().await;
        debug!(removed, remaining = self.cache.entry_count(), "Cache sweep complete");
        removed
    }

    /// Remove `key` only if the entry stored right now was already expired
    /// at `now`; a value written since then is left in place
    async fn remove_if_expired(&self, key: &str, now: Instant) -> bool {
        let result = self
            .cache
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if entry.value().is_expired(now) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        matches!(result, CompResult::Removed(_))
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CachePort for MokaCache {
    #[instrument(skip(self), level = "debug")]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        let now = Instant::now();
        match self.cache.get(key).await {
            Some(entry) if !entry.is_expired(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit");
                Ok(Some(entry.value))
            },
            Some(_) => {
                self.remove_if_expired(key, now).await;
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache entry expired");
                Ok(None)
            },
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss");
                Ok(None)
            },
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl.min(self.hard_ttl),
        };
        self.cache.insert(key.to_string(), entry).await;
        debug!(key = %key, "Cache set");
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}
