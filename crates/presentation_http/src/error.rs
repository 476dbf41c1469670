//! API error handling
//!
//! Every error body is an unsuccessful `GeocodeResponse`, so clients parse a
//! single shape regardless of outcome.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::GeocodeResponse;
use integration_geocoding::GeocodingError;
use thiserror::Error;
use tracing::warn;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Geocoding(err) => match err {
                GeocodingError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                GeocodingError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                GeocodingError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                GeocodingError::ConnectionFailed(_)
                | GeocodingError::UpstreamStatus { .. }
                | GeocodingError::ParseError(_) => StatusCode::BAD_GATEWAY,
                GeocodingError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "Request failed");
        }

        (status, Json(GeocodeResponse::rejected(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: GeocodingError) -> StatusCode {
        ApiError::from(err).status_code()
    }

    #[test]
    fn bad_request_message_is_verbatim() {
        let err = ApiError::BadRequest("query parameter 'q' is required".to_string());
        assert_eq!(err.to_string(), "query parameter 'q' is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn geocoding_errors_map_to_statuses() {
        assert_eq!(
            status_of(GeocodingError::RateLimited {
                provider: "Nominatim".to_string()
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(GeocodingError::Cancelled),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(GeocodingError::Timeout { timeout_secs: 10 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(GeocodingError::ConnectionFailed("refused".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(GeocodingError::UpstreamStatus {
                status: 500,
                body: String::new()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(GeocodingError::ParseError("eof".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(GeocodingError::Configuration("bad".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn geocoding_error_message_is_transparent() {
        let err = ApiError::from(GeocodingError::UpstreamStatus {
            status: 503,
            body: "busy".to_string(),
        });
        assert_eq!(err.to_string(), "server returned 503: busy");
    }
}
