//! Provider status and reset handlers

use axum::{Json, extract::State, http::StatusCode};
use domain::ServerStatus;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{error::ApiError, state::AppState};

/// Provider counters with cache statistics
pub async fn get_status(State(state): State<AppState>) -> Result<Json<ServerStatus>, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let status = state.geocoding_service.status(&cancel).await?;
    Ok(Json(status))
}

/// Zero the provider counters; cached entries survive
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.geocoding_service.reset()?;
    info!(
        provider = state.geocoding_service.provider_name(),
        "Provider metrics reset"
    );
    Ok(StatusCode::NO_CONTENT)
}
