//! Application services - Use case implementations

mod geocoding_service;

pub use geocoding_service::{GeocodingService, cache_key};
