//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/status", get(handlers::status::get_status))
        .route("/reset", post(handlers::status::reset))
        // Geocoding
        .route(
            "/geocode",
            get(handlers::geocode::geocode_query).post(handlers::geocode::geocode_body),
        )
        // Attach state
        .with_state(state)
}
