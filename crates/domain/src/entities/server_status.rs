//! Provider status snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of a provider's counters
///
/// Providers always report zero cache counters; the geocoding service fills
/// them in from the cache it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// "active" or "inactive"
    pub status: String,
    /// Name of the provider this snapshot describes
    pub provider: String,
    /// Crate version that produced the snapshot
    #[serde(default)]
    pub version: String,
    /// Seconds elapsed since the last request (0 if none recorded)
    pub uptime: f64,
    /// Timestamp of the last request, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Number of live cache entries
    pub cache_size: u64,
    /// Cache hits observed by the service
    pub cache_hits: u64,
    /// Cache misses observed by the service
    pub cache_misses: u64,
    /// Requests issued to the provider since the last reset
    pub requests_total: u64,
    /// Upstream failures since the last reset
    pub errors_total: u64,
    /// Mean seconds spent per request
    pub average_time: f64,
}

impl ServerStatus {
    /// Attach cache counters to a provider snapshot
    #[must_use]
    pub const fn with_cache(mut self, size: u64, hits: u64, misses: u64) -> Self {
        self.cache_size = size;
        self.cache_hits = hits;
        self.cache_misses = misses;
        self
    }
}
