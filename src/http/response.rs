//! Error responses.
//!
//! # Status mapping
//! - Malformed date: 400 Bad Request
//! - Upstream failed (fatal or retries exhausted): 500 Internal Server Error
//! - Request deadline elapsed: 504 Gateway Timeout
//!
//! Bodies are `{"detail": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::documents::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        let status = match &err {
            FetchError::Validation(_) => {
                tracing::warn!(error = %err, "Rejected malformed date");
                StatusCode::BAD_REQUEST
            }
            FetchError::Upstream(_) => {
                tracing::error!(error = %err, "Upstream fetch failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            FetchError::DeadlineExceeded(_) => {
                tracing::warn!(error = %err, "Request deadline exceeded");
                StatusCode::GATEWAY_TIMEOUT
            }
        };

        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
