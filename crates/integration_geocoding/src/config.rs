//! Geocoding provider configuration

use domain::ProviderKind;
use serde::{Deserialize, Serialize};

/// Configuration for the upstream geocoding providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Which backend serves requests
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL of the Nominatim instance
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// Base URL of the Pelias instance
    #[serde(default = "default_pelias_url")]
    pub pelias_url: String,

    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Outbound request ceiling for Nominatim
    #[serde(default = "default_nominatim_rps")]
    pub nominatim_requests_per_second: u32,

    /// Outbound request ceiling for Pelias
    #[serde(default = "default_pelias_rps")]
    pub pelias_requests_per_second: u32,

    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_nominatim_url() -> String {
    "http://nominatim:8080".to_string()
}

fn default_pelias_url() -> String {
    "http://pelias:3000".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_nominatim_rps() -> u32 {
    ProviderKind::Nominatim.default_requests_per_second()
}

const fn default_pelias_rps() -> u32 {
    ProviderKind::Pelias.default_requests_per_second()
}

fn default_user_agent() -> String {
    format!("geocoding-gateway/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            nominatim_url: default_nominatim_url(),
            pelias_url: default_pelias_url(),
            timeout_secs: default_timeout_secs(),
            nominatim_requests_per_second: default_nominatim_rps(),
            pelias_requests_per_second: default_pelias_rps(),
            user_agent: default_user_agent(),
        }
    }
}

impl GeocodingConfig {
    /// Configuration pointing the selected provider at a local test server
    #[must_use]
    pub fn for_testing(provider: ProviderKind, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            provider,
            nominatim_url: base_url.clone(),
            pelias_url: base_url,
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Base URL of the selected provider
    #[must_use]
    pub fn base_url(&self) -> &str {
        match self.provider {
            ProviderKind::Nominatim => &self.nominatim_url,
            ProviderKind::Pelias => &self.pelias_url,
        }
    }

    /// Request ceiling of the selected provider
    #[must_use]
    pub const fn requests_per_second(&self) -> u32 {
        match self.provider {
            ProviderKind::Nominatim => self.nominatim_requests_per_second,
            ProviderKind::Pelias => self.pelias_requests_per_second,
        }
    }

    /// Validate the configuration for the selected provider
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url().trim().is_empty() {
            return Err(format!("{}_url must not be empty", self.provider.config_key()));
        }
        if url::Url::parse(self.base_url()).is_err() {
            return Err(format!(
                "{}_url is not a valid URL: {}",
                self.provider.config_key(),
                self.base_url()
            ));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.requests_per_second() == 0 {
            return Err(format!(
                "{}_requests_per_second must be greater than 0",
                self.provider.config_key()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeocodingConfig::default();
        assert_eq!(config.provider, ProviderKind::Nominatim);
        assert_eq!(config.nominatim_url, "http://nominatim:8080");
        assert_eq!(config.pelias_url, "http://pelias:3000");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.nominatim_requests_per_second, 5);
        assert_eq!(config.pelias_requests_per_second, 10);
        assert!(config.user_agent.starts_with("geocoding-gateway/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_selected_provider_settings() {
        let config = GeocodingConfig {
            provider: ProviderKind::Pelias,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://pelias:3000");
        assert_eq!(config.requests_per_second(), 10);
    }

    #[test]
    fn test_validation_rejects_zero_rate() {
        let config = GeocodingConfig {
            nominatim_requests_per_second: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("nominatim_requests_per_second"));
    }

    #[test]
    fn test_validation_ignores_unselected_provider() {
        let config = GeocodingConfig {
            pelias_url: String::new(),
            pelias_requests_per_second: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let config = GeocodingConfig {
            nominatim_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GeocodingConfig {
            nominatim_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = GeocodingConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: GeocodingConfig = serde_json::from_str(r#"{"provider":"pelias"}"#).unwrap();
        assert_eq!(config.provider, ProviderKind::Pelias);
        assert_eq!(config.timeout_secs, 10);

        assert!(serde_json::from_str::<GeocodingConfig>(r#"{"provider":"google"}"#).is_err());
    }
}
