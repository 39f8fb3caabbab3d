use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::auth::jwt::JwtTokenProvider;

/// JWT authentication extractor for protected routes
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(user_id): JwtAuth,
/// ) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", user_id))
/// }
/// ```
pub struct JwtAuth(pub Uuid);

/// Like [`JwtAuth`] but lets anonymous requests through
///
/// A missing header yields `None`; a header carrying a bad token is still
/// rejected.
pub struct OptionalJwtAuth(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for JwtAuth
where
    JwtTokenProvider: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        authenticate(header, &JwtTokenProvider::from_ref(state)).map(JwtAuth)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalJwtAuth
where
    JwtTokenProvider: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(AUTHORIZATION) {
            None => Ok(OptionalJwtAuth(None)),
            Some(header) => {
                authenticate(header, &JwtTokenProvider::from_ref(state)).map(|id| OptionalJwtAuth(Some(id)))
            }
        }
    }
}

fn authenticate(
    header: &axum::http::HeaderValue,
    tokens: &JwtTokenProvider,
) -> Result<Uuid, ApiError> {
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>"))?;

    let claims = tokens
        .verify_token(token)
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

    Ok(claims.sub)
}
