//! Tracing subscriber setup
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` (overridable via
//! `RUST_LOG`) and either human-readable or JSON formatted output.

use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "geocoding_gateway=info,presentation_http=info,application=info,\
                                  integration_geocoding=info,infrastructure=info,tower_http=info";

/// Install the global subscriber
///
/// `log_format` is `"json"` for structured output; anything else selects the
/// human-readable format.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(log_format: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}
