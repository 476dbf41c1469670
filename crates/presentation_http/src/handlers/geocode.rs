//! Geocoding handlers
//!
//! `GET /geocode?q=..` and `POST /geocode {"query": ..}` both resolve through
//! the shared service. Each request carries its own cancellation token, which
//! fires if the client disconnects and the handler future is dropped.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use domain::GeocodeResponse;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Query string for `GET /geocode`
#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    pub q: Option<String>,
}

/// Body for `POST /geocode`
#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    #[serde(default)]
    pub query: String,
}

/// Geocode the `q` query parameter
pub async fn geocode_query(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("query parameter 'q' is required".to_string()))?;

    geocode(&state, &query).await
}

/// Geocode the `query` field of a JSON body
pub async fn geocode_body(
    State(state): State<AppState>,
    payload: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "Rejected geocode request body");
        ApiError::BadRequest("invalid request format".to_string())
    })?;

    geocode(&state, &request.query).await
}

async fn geocode(state: &AppState, query: &str) -> Result<Json<GeocodeResponse>, ApiError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let response = state.geocoding_service.geocode(query, &cancel).await?;
    Ok(Json(response))
}
