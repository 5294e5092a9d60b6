//! Coin transfer handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use merch_core::SendCoinRequest;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::handlers::EmptyResponse;
use crate::state::AppState;

/// Send coin request body.
///
/// `amount` is signed on the wire so zero and negative values are reported
/// as validation failures, not parse failures.
#[derive(Debug, Deserialize, Validate)]
pub struct SendCoinBody {
    /// Recipient username.
    #[serde(rename = "toUser", default)]
    #[validate(length(min = 1))]
    pub to_user: String,
    /// Coins to send.
    #[serde(default)]
    #[validate(range(min = 1))]
    pub amount: i64,
}

impl TryFrom<SendCoinBody> for SendCoinRequest {
    type Error = ApiError;

    fn try_from(body: SendCoinBody) -> Result<Self, Self::Error> {
        Ok(Self {
            to_user: body.to_user,
            amount: u64::try_from(body.amount).map_err(|_| ApiError::InvalidBody)?,
        })
    }
}

/// Send coins to another account.
pub async fn send_coin(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<SendCoinBody>,
) -> Result<Json<EmptyResponse>, ApiError> {
    let request = SendCoinRequest::try_from(body)?;
    state.shop.send_coin(auth.account_id, &request).await?;

    Ok(Json(EmptyResponse {}))
}
