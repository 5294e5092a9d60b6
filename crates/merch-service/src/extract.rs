//! Validated JSON request bodies.

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// A JSON body that parsed and passed its `Validate` rules.
///
/// Parse failures (bad JSON, wrong types, missing content type) reject with
/// `ApiError::MalformedBody`; rule failures with `ApiError::InvalidBody`.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Request body rejected");
            ApiError::MalformedBody
        })?;

        body.validate().map_err(|e| {
            tracing::debug!(error = %e, "Request body failed validation");
            ApiError::InvalidBody
        })?;

        Ok(Self(body))
    }
}
