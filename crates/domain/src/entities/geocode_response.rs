//! Outcome of a single geocode attempt

use serde::{Deserialize, Serialize};

use super::Address;

/// Error message for queries that are blank after trimming
pub const EMPTY_QUERY: &str = "empty query";

/// Error message for queries the upstream resolved to zero candidates
pub const NO_RESULTS_FOUND: &str = "no results found";

/// Result envelope returned by providers and the geocoding service
///
/// Exactly one of `address` / `error` is populated: successful responses carry
/// an address and no error, unsuccessful ones carry a non-empty error and
/// never an address. The `cached` flag is only ever set by the cache layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    processing_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    cached: bool,
}

impl GeocodeResponse {
    /// Successful resolution of a query
    #[must_use]
    pub fn success(address: Address, source: impl Into<String>, processing_time: f64) -> Self {
        Self {
            success: true,
            address: Some(address),
            error: None,
            processing_time: Some(processing_time),
            source: Some(source.into()),
            cached: false,
        }
    }

    /// Non-error unsuccessful outcome attributed to a provider
    #[must_use]
    pub fn failure(error: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            success: false,
            address: None,
            error: Some(error.into()),
            processing_time: None,
            source: Some(source.into()),
            cached: false,
        }
    }

    /// Unsuccessful outcome with no provider attribution (request rejected
    /// before reaching a provider)
    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            address: None,
            error: Some(error.into()),
            processing_time: None,
            source: None,
            cached: false,
        }
    }

    /// Empty query outcome for the given provider
    #[must_use]
    pub fn empty_query(source: impl Into<String>) -> Self {
        Self::failure(EMPTY_QUERY, source)
    }

    /// Zero-candidate outcome for the given provider
    #[must_use]
    pub fn no_results(source: impl Into<String>) -> Self {
        Self::failure(NO_RESULTS_FOUND, source)
    }

    /// Mark this response as served from cache
    #[must_use]
    pub fn into_cached(mut self) -> Self {
        self.cached = true;
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub const fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn processing_time(&self) -> Option<f64> {
        self.processing_time
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.cached
    }
}
