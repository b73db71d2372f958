//! API error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use mercator_market_data::MarketDataError;

/// Result alias used by all request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid client input, rejected before any provider interaction.
    #[error("{0}")]
    BadRequest(String),

    /// Total provider failure with no cached payload to fall back on.
    #[error("Error fetching ticker data: {0}")]
    CacheEmpty(#[source] MarketDataError),

    /// Provider gateway failure surfaced directly (detail/history paths).
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::CacheEmpty(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MarketData(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::MarketData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
