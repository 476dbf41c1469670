//! Upstream geocoding provider configuration.

use domain::ProviderKind;
use integration_geocoding::GeocodingConfig;
use serde::{Deserialize, Serialize};

/// Geocoding provider selection and upstream settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// Active provider ("nominatim" or "pelias")
    #[serde(default)]
    pub provider: ProviderKind,

    /// Nominatim base URL
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// Pelias base URL
    #[serde(default = "default_pelias_url")]
    pub pelias_url: String,

    /// Upstream HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Nominatim request ceiling per second
    #[serde(default = "default_nominatim_rps")]
    pub nominatim_requests_per_second: u32,

    /// Pelias request ceiling per second
    #[serde(default = "default_pelias_rps")]
    pub pelias_requests_per_second: u32,

    /// Override for the User-Agent header sent upstream
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_nominatim_url() -> String {
    "http://nominatim:8080".to_string()
}

fn default_pelias_url() -> String {
    "http://pelias:3000".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_nominatim_rps() -> u32 {
    ProviderKind::Nominatim.default_requests_per_second()
}

const fn default_pelias_rps() -> u32 {
    ProviderKind::Pelias.default_requests_per_second()
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            nominatim_url: default_nominatim_url(),
            pelias_url: default_pelias_url(),
            timeout_secs: default_timeout(),
            nominatim_requests_per_second: default_nominatim_rps(),
            pelias_requests_per_second: default_pelias_rps(),
            user_agent: None,
        }
    }
}

impl GeocodingAppConfig {
    /// Convert to `integration_geocoding` config
    #[must_use]
    pub fn to_geocoding_config(&self) -> GeocodingConfig {
        let mut config = GeocodingConfig {
            provider: self.provider,
            nominatim_url: self.nominatim_url.clone(),
            pelias_url: self.pelias_url.clone(),
            timeout_secs: self.timeout_secs,
            nominatim_requests_per_second: self.nominatim_requests_per_second,
            pelias_requests_per_second: self.pelias_requests_per_second,
            ..GeocodingConfig::default()
        };
        if let Some(ref user_agent) = self.user_agent {
            config.user_agent.clone_from(user_agent);
        }
        config
    }
}
