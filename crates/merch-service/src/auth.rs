//! Authentication extractor.
//!
//! Protected handlers take an [`AuthUser`] argument; the request is rejected
//! before the handler runs if no valid bearer token is present.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use merch_core::AccountId;

use crate::error::ApiError;
use crate::state::AppState;

/// The account a request is authenticated as.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The account id from the token subject.
    pub account_id: AccountId,
}

/// Extract the token from an `Authorization` header value.
///
/// The `Bearer` prefix is optional and surrounding whitespace is ignored.
/// Returns `None` when nothing remains.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingAuth)?;

        let token = bearer_token(header).ok_or(ApiError::MissingAuth)?;

        let account_id = state
            .tokens
            .verify(token)
            .map_err(|_| ApiError::InvalidToken)?;

        Ok(Self { account_id })
    }
}
