//! Merch purchase handler.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::EmptyResponse;
use crate::state::AppState;

/// Buy one unit of the named item.
pub async fn buy_merch(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(item): Path<String>,
) -> Result<Json<EmptyResponse>, ApiError> {
    state.shop.buy_merch(auth.account_id, &item).await?;
    Ok(Json(EmptyResponse {}))
}
