//! Bearer credential extraction for protected routes.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::credential::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Claims of a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct Bearer(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for Bearer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("authorization header required"))?
            .to_str()
            .map_err(|_| ApiError::unauthorized("invalid authorization header format"))?;

        let token = match header.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
            _ => return Err(ApiError::unauthorized("invalid authorization header format")),
        };

        let claims = state.credentials.verify(token).map_err(|e| {
            debug!(error = %e, "Rejected bearer credential");
            ApiError::from(e)
        })?;

        Ok(Bearer(claims))
    }
}
