//! Login handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use merch_core::Credentials;

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Login request.
///
/// Absent fields deserialize as empty and fail validation rather than parsing.
#[derive(Deserialize, Validate)]
pub struct AuthRequest {
    /// Login name.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub username: String,
    /// Plaintext password.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Authenticate, registering unknown usernames, and return a token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let credentials = Credentials::new(body.username, body.password);
    let token = state.shop.login(&credentials).await?;

    Ok(Json(AuthResponse { token }))
}
