//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP listener and logging settings
//! - `geocoding`: provider selection and upstream settings
//! - `cache`: response cache TTLs and size
//!
//! Sources, lowest precedence first: built-in defaults, the legacy
//! `GEOCODING_SERVER` / `PORT` / `NOMINATIM_URL` / `PELIAS_URL` variables,
//! an optional config file, then `GEOCODER_*` environment variables using
//! `__` as the nesting separator (e.g. `GEOCODER_GEOCODING__PROVIDER=pelias`).

mod cache;
mod geocoding;
mod server;

use application::ApplicationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use cache::CacheConfig;
pub use geocoding::GeocodingAppConfig;
pub use server::ServerConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "GEOCODER_CONFIG";

/// Longest accepted hard TTL (one year)
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Unprefixed variables honoured as defaults, keyed by config path
const LEGACY_ENV: [(&str, &str); 4] = [
    ("geocoding.provider", "GEOCODING_SERVER"),
    ("server.port", "PORT"),
    ("geocoding.nominatim_url", "NOMINATIM_URL"),
    ("geocoding.pelias_url", "PELIAS_URL"),
];

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream geocoding provider settings
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from the file named by `GEOCODER_CONFIG` (or an
    /// optional `config.*` in the working directory) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(path.as_deref())
    }

    /// Load configuration, reading `path` as a required config file if given
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        for (key, var) in LEGACY_ENV {
            if let Ok(value) = std::env::var(var) {
                debug!(key, var, "Using legacy environment variable");
                builder = builder.set_default(key, value)?;
            }
        }

        let file = match path {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        builder
            .add_source(file)
            // Override with environment variables (e.g., GEOCODER_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix("GEOCODER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject settings the service cannot start with
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` describing the first
    /// invalid setting.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.server.port == 0 {
            return Err(ApplicationError::Configuration(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.server.log_format.as_str(), "text" | "json") {
            return Err(ApplicationError::Configuration(format!(
                "server.log_format must be 'text' or 'json', got '{}'",
                self.server.log_format
            )));
        }

        self.geocoding
            .to_geocoding_config()
            .validate()
            .map_err(|e| ApplicationError::Configuration(format!("geocoding: {e}")))?;

        if self.cache.ttl_secs == 0 {
            return Err(ApplicationError::Configuration(
                "cache.ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.cache.cleanup_secs < self.cache.ttl_secs {
            return Err(ApplicationError::Configuration(format!(
                "cache.cleanup_secs ({}) must not be shorter than cache.ttl_secs ({})",
                self.cache.cleanup_secs, self.cache.ttl_secs
            )));
        }

        if self.cache.cleanup_secs > MAX_CACHE_TTL_SECS {
            return Err(ApplicationError::Configuration(format!(
                "cache.cleanup_secs ({}) must not exceed {MAX_CACHE_TTL_SECS}",
                self.cache.cleanup_secs
            )));
        }

        if self.cache.max_entries == 0 {
            return Err(ApplicationError::Configuration(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
