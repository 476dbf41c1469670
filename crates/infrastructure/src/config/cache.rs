//! Response cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Geocoding response cache settings
///
/// Entries are treated as absent after `ttl_secs` and purged no later than
/// `cleanup_secs`, which is also the sweep interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Soft TTL in seconds (default: 24 hours)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Hard TTL and sweep interval in seconds (default: 48 hours)
    #[serde(default = "default_cleanup")]
    pub cleanup_secs: u64,

    /// Maximum number of cached responses
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

const fn default_ttl() -> u64 {
    24 * 60 * 60 // 24 hours
}

const fn default_cleanup() -> u64 {
    48 * 60 * 60 // 48 hours
}

const fn default_max_entries() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            cleanup_secs: default_cleanup(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    /// Soft TTL as a Duration
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Hard TTL / sweep interval as a Duration
    #[must_use]
    pub const fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_secs)
    }
}
