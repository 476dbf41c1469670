//! Application state shared across handlers

use std::sync::Arc;

use application::GeocodingService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Cache-fronted geocoding service
    pub geocoding_service: Arc<GeocodingService>,
}

impl AppState {
    #[must_use]
    pub fn new(geocoding_service: GeocodingService) -> Self {
        Self {
            geocoding_service: Arc::new(geocoding_service),
        }
    }
}
