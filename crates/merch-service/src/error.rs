//! API error types and responses.
//!
//! Every error leaves the service as `{"error": "<message>"}` with the
//! status from [`ApiError::status`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use merch_core::ShopError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body is not valid JSON of the expected shape.
    #[error("failed to parse the request body")]
    MalformedBody,

    /// The request body parsed but a field is missing, empty or out of range.
    #[error("failed to validate the structure of request body")]
    InvalidBody,

    /// Username shape rejected.
    #[error("username not valid")]
    InvalidUsername,

    /// Password shape rejected.
    #[error("password not valid")]
    InvalidPassword,

    /// Balance too low.
    #[error("not enough coins")]
    InsufficientFunds,

    /// Transfer to the caller's own account.
    #[error("can't send coins to yourself")]
    SelfTransfer,

    /// Transfer recipient does not exist.
    #[error("recipient not found")]
    RecipientMissing,

    /// Unknown merch item.
    #[error("item not found")]
    ItemNotFound,

    /// The `Authorization` header is absent or carries no bearer token.
    #[error("the Authorization header is empty or does not contain Bearer token")]
    MissingAuth,

    /// The bearer token failed verification.
    #[error("invalid token")]
    InvalidToken,

    /// Wrong credentials, or the token's account no longer exists.
    #[error("invalid username or password")]
    Unauthorized,

    /// No route matches the path.
    #[error("route not found")]
    RouteNotFound,

    /// The route exists but not for this method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The request ran past the configured deadline.
    #[error("request timed out")]
    Timeout,

    /// Internal server error. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedBody
            | Self::InvalidBody
            | Self::InvalidUsername
            | Self::InvalidPassword
            | Self::InsufficientFunds
            | Self::SelfTransfer
            | Self::RecipientMissing
            | Self::ItemNotFound => StatusCode::BAD_REQUEST,
            Self::MissingAuth | Self::InvalidToken | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        match err {
            ShopError::InvalidUsername => Self::InvalidUsername,
            ShopError::InvalidPassword => Self::InvalidPassword,
            ShopError::InvalidAmount => Self::InvalidBody,
            ShopError::Unauthorized => Self::Unauthorized,
            ShopError::InsufficientFunds => Self::InsufficientFunds,
            ShopError::SelfTransfer => Self::SelfTransfer,
            ShopError::RecipientMissing => Self::RecipientMissing,
            ShopError::ItemNotFound => Self::ItemNotFound,
            ShopError::Token(msg) | ShopError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl From<merch_store::StoreError> for ApiError {
    fn from(err: merch_store::StoreError) -> Self {
        ShopError::from(err).into()
    }
}
