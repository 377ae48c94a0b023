//! `/api/users`: registration, challenge–response login and lookups.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dropkey_core::Identity;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::blocking;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub public_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub challenge: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct PublicKeyQuery {
    #[serde(default)]
    pub public_key: String,
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(req) = body.map_err(|_| ApiError::bad_request("invalid JSON payload"))?;

    let id = blocking(move || Ok(state.registry.register(&req.public_key)?)).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { id })))
}

pub async fn authenticate(
    State(state): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = body.map_err(|_| ApiError::bad_request("invalid JSON payload"))?;

    let token = blocking(move || {
        let verified = state
            .authenticator
            .authenticate(&req.id, &req.signature, &req.challenge)?;
        let token = state.credentials.issue(&verified)?;
        info!(user_id = %verified.id(), "Credential issued");
        Ok(token)
    })
    .await?;

    Ok(Json(AuthResponse {
        message: "authentication successful".to_string(),
        token,
    }))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Identity>, ApiError> {
    let identity = blocking(move || Ok(state.registry.get_by_id(&id)?)).await?;
    Ok(Json(identity))
}

pub async fn get_by_public_key(
    State(state): State<AppState>,
    Query(query): Query<PublicKeyQuery>,
) -> Result<Json<Identity>, ApiError> {
    if query.public_key.is_empty() {
        return Err(ApiError::bad_request("missing public key"));
    }

    let identity =
        blocking(move || Ok(state.registry.get_by_public_key(&query.public_key)?)).await?;
    Ok(Json(identity))
}
