use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Extracts and validates the bearer JWT, yielding the caller's user ID.
///
/// Handlers that take this extractor never run for unauthenticated requests;
/// the rejection renders as a uniform 401.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or(ApiError::MissingToken)?;
        let header = header.to_str().map_err(|_| ApiError::MalformedToken)?;

        // Exactly two space-separated parts, scheme literally "Bearer".
        let mut split = header.split(' ');
        let token = match (split.next(), split.next(), split.next()) {
            (Some("Bearer"), Some(token), None) => token,
            _ => return Err(ApiError::MalformedToken),
        };

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token verification failed");
            ApiError::InvalidToken
        })?;

        Ok(AuthUser(claims.sub))
    }
}
