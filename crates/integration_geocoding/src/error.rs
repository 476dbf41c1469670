//! Geocoding error types

use thiserror::Error;

/// Errors surfaced by geocoding providers
///
/// Empty queries and zero-candidate results are not errors; providers report
/// those as unsuccessful [`domain::GeocodeResponse`] values instead.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Admission wait aborted before the upstream was contacted
    #[error("rate limit error: {provider} admission cancelled")]
    RateLimited {
        /// Provider whose limiter was waiting
        provider: String,
    },

    /// In-flight upstream call aborted by the caller
    #[error("request cancelled")]
    Cancelled,

    /// Connection to the upstream failed
    #[error("request failed: {0}")]
    ConnectionFailed(String),

    /// Upstream did not answer within the client timeout
    #[error("request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Upstream answered with a non-2xx status
    #[error("server returned {status}: {body}")]
    UpstreamStatus {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the upstream
        body: String,
    },

    /// Upstream body could not be decoded
    #[error("failed to decode response: {0}")]
    ParseError(String),

    /// Invalid provider configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GeocodingError {
    /// Returns true if the caller's cancellation produced this error
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Cancelled)
    }

    /// Classify a reqwest transport error
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}
