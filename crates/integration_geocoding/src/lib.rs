#![forbid(unsafe_code)]
//! Upstream geocoding providers
//!
//! Every backend implements [`GeocodingProvider`] and owns its own
//! [`RateLimiter`] and [`ProviderMetrics`]. Backends differ only in request
//! URL construction and response parsing:
//!
//! - [`NominatimProvider`]: `/search`, flat JSON array with string `lat`/`lon`
//! - [`PeliasProvider`]: `/v1/search`, GeoJSON FeatureCollection with `[lon, lat]`
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{GeocodingConfig, create_provider};
//! use tokio_util::sync::CancellationToken;
//!
//! let provider = create_provider(&GeocodingConfig::default())?;
//! let response = provider
//!     .geocode(&CancellationToken::new(), "10 Downing Street, London")
//!     .await?;
//! ```

mod config;
mod error;
mod metrics;
mod nominatim;
mod pelias;
mod provider;
mod rate_limiter;

pub use config::GeocodingConfig;
pub use error::GeocodingError;
pub use metrics::{MetricsSnapshot, ProviderMetrics};
pub use nominatim::NominatimProvider;
pub use pelias::PeliasProvider;
pub use provider::GeocodingProvider;
pub use rate_limiter::RateLimiter;

use std::sync::Arc;

use domain::ProviderKind;
use tracing::info;

/// Build the provider selected by `config.provider`
///
/// # Errors
///
/// Returns `GeocodingError::Configuration` if the selected provider's
/// settings are invalid.
pub fn create_provider(
    config: &GeocodingConfig,
) -> Result<Arc<dyn GeocodingProvider>, GeocodingError> {
    config.validate().map_err(GeocodingError::Configuration)?;

    let provider: Arc<dyn GeocodingProvider> = match config.provider {
        ProviderKind::Nominatim => Arc::new(NominatimProvider::new(config)?),
        ProviderKind::Pelias => Arc::new(PeliasProvider::new(config)?),
    };

    info!(
        provider = provider.name(),
        base_url = config.base_url(),
        requests_per_second = config.requests_per_second(),
        "Geocoding provider initialized"
    );
    Ok(provider)
}
