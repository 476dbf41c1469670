//! Geocoding gateway HTTP presentation layer
//!
//! Thin axum shim over [`application::GeocodingService`]: request parsing,
//! error-to-status mapping and route wiring.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
