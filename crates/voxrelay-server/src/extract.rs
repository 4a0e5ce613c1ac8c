//! Validating extractors
//!
//! `ValidJson<P>` / `ValidQuery<P>` deserialize the wire payload `P` and run
//! its [`Validate`] check, so handlers receive the typed request and bad
//! input is rejected with a 400 before any upstream call.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use voxrelay::Validate;

use crate::error::ApiError;

/// JSON body validated into `P::Output`
pub struct ValidJson<P: Validate>(pub P::Output);

#[async_trait]
impl<S, P> FromRequest<S> for ValidJson<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Validate + Send,
    P::Output: Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<P>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(Self(payload.validate()?))
    }
}

/// Query string validated into `P::Output`
pub struct ValidQuery<P: Validate>(pub P::Output);

#[async_trait]
impl<S, P> FromRequestParts<S> for ValidQuery<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Validate + Send,
    P::Output: Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(payload) = Query::<P>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(Self(payload.validate()?))
    }
}
