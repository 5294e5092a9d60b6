//! Account info handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use merch_core::Info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Get balance, inventory and coin history of the caller.
pub async fn get_info(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Info>, ApiError> {
    let info = state.shop.info(auth.account_id).await?;
    Ok(Json(info))
}
