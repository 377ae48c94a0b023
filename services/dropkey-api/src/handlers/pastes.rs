//! `/api/pastes`: signed paste creation, retrieval and update.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dropkey_core::Paste;
use dropkey_paste::PasteSubmission;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::blocking;
use crate::auth::Bearer;
use crate::error::ApiError;
use crate::state::AppState;

use super::users::PublicKeyQuery;

#[derive(Debug, Deserialize)]
pub struct CreatePasteRequest {
    #[serde(default)]
    pub ciphertext: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub public_key: String,
    /// Lifetime in seconds from now
    #[serde(default)]
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasteRequest {
    #[serde(default)]
    pub ciphertext: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub public_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePasteResponse {
    pub id: String,
    pub url: String,
}

/// The submitted key must be the key the credential was issued for.
fn check_owner(bearer: &Bearer, public_key: &str) -> Result<(), ApiError> {
    if bearer.0.public_key != public_key {
        warn!(user_id = %bearer.0.sub, "Paste key does not match credential");
        return Err(ApiError::unauthorized("unauthorized access"));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    bearer: Bearer,
    body: Result<Json<CreatePasteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePasteResponse>), ApiError> {
    let Json(req) = body.map_err(|_| ApiError::bad_request("invalid JSON payload"))?;
    check_owner(&bearer, &req.public_key)?;

    let submission = PasteSubmission {
        ciphertext: req.ciphertext,
        signature: req.signature,
        public_key: req.public_key,
    };
    let ttl = req.expires_in;
    let store = state.pastes.clone();
    let paste = blocking(move || Ok(store.create(submission, ttl)?)).await?;

    let url = state.share_url(&paste.id, &paste.public_key);
    info!(paste_id = %paste.id, user_id = %bearer.0.sub, "Paste published");
    Ok((
        StatusCode::CREATED,
        Json(CreatePasteResponse { id: paste.id, url }),
    ))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Paste>, ApiError> {
    let paste = blocking(move || Ok(state.pastes.get_by_id(&id)?)).await?;
    Ok(Json(paste))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    bearer: Bearer,
    body: Result<Json<UpdatePasteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body.map_err(|_| ApiError::bad_request("invalid JSON payload"))?;
    check_owner(&bearer, &req.public_key)?;

    let submission = PasteSubmission {
        ciphertext: req.ciphertext,
        signature: req.signature,
        public_key: req.public_key,
    };
    blocking(move || Ok(state.pastes.update(&id, submission)?)).await?;

    Ok(Json(json!({ "message": "paste updated" })))
}

pub async fn get_by_public_key(
    State(state): State<AppState>,
    Query(query): Query<PublicKeyQuery>,
) -> Result<Json<Vec<Paste>>, ApiError> {
    let pastes = blocking(move || Ok(state.pastes.get_by_public_key(&query.public_key)?)).await?;

    if pastes.is_empty() {
        return Err(ApiError::not_found("all pastes have expired for this user"));
    }
    Ok(Json(pastes))
}
