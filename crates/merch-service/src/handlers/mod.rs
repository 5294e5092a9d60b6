//! API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

pub mod auth;
pub mod coins;
pub mod health;
pub mod info;
pub mod merch;

/// Empty JSON object returned by write endpoints on success.
#[derive(Debug, Default, Serialize)]
pub struct EmptyResponse {}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Fallback for known paths called with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Replace the timeout layer's bare 408 with the JSON error envelope.
pub async fn timeout_envelope(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("Request deadline elapsed");
        return ApiError::Timeout.into_response();
    }
    response
}
