//! Mapping from core error kinds to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dropkey_core::ErrorKind;
use dropkey_identity::{AuthError, RegistryError};
use dropkey_paste::PasteError;
use serde_json::json;
use tracing::error;

use crate::credential::CredentialError;

/// Error returned by every handler. The body is always `{"error": msg}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Opaque 500; the cause is logged, never returned.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "Internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn from_kind(kind: ErrorKind, message: String) -> Self {
        let status = match kind {
            ErrorKind::Validation | ErrorKind::SignatureVerificationFailed => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Expired => StatusCode::GONE,
            ErrorKind::OwnerNotFound => StatusCode::UNAUTHORIZED,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Storage => return Self::internal(message),
        };
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self::from_kind(e.kind(), e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e.kind() {
            // A well-formed proof that does not verify is an authentication
            // failure, not a bad request.
            ErrorKind::SignatureVerificationFailed => Self::unauthorized(e.to_string()),
            kind => Self::from_kind(kind, e.to_string()),
        }
    }
}

impl From<PasteError> for ApiError {
    fn from(e: PasteError) -> Self {
        Self::from_kind(e.kind(), e.to_string())
    }
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Encode(e) => Self::internal(e),
            e @ CredentialError::LifetimeOutOfRange { .. } => Self::internal(e),
            e => Self::unauthorized(e.to_string()),
        }
    }
}
