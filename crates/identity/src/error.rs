//! Error types for identity operations.

use dropkey_core::{ErrorKind, StorageError};
use dropkey_crypto::CryptoError;
use thiserror::Error;

/// Errors reported by the identity registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("public key is empty")]
    EmptyPublicKey,

    #[error("public key is not base64 encoded or has invalid size: {0}")]
    InvalidPublicKey(#[source] CryptoError),

    #[error("an identity with this public key already exists")]
    DuplicateKey,

    #[error("failed to create identity: {0}")]
    UserCreationFailed(#[source] StorageError),

    #[error("identity id is empty")]
    EmptyId,

    #[error("invalid identity id: {id}")]
    InvalidId { id: String },

    #[error("identity not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::EmptyPublicKey
            | RegistryError::InvalidPublicKey(_)
            | RegistryError::EmptyId
            | RegistryError::InvalidId { .. } => ErrorKind::Validation,
            RegistryError::DuplicateKey => ErrorKind::Conflict,
            RegistryError::NotFound => ErrorKind::NotFound,
            RegistryError::UserCreationFailed(_) | RegistryError::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Errors reported by the authenticator.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user id is empty")]
    EmptyUserId,

    #[error("challenge is empty")]
    EmptyChallenge,

    #[error("challenge is not valid base64")]
    InvalidChallenge,

    #[error("signature is empty")]
    EmptySignature,

    /// `malformed` is set when the signature could not be decoded; otherwise
    /// it decoded but did not verify.
    #[error("invalid signature")]
    InvalidSignature { malformed: bool },

    #[error("user not found")]
    UserNotFound,

    /// The stored key for this identity no longer decodes. Corrupted data.
    #[error("stored public key for identity {user_id} is invalid")]
    InvalidPublicKey { user_id: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmptyUserId
            | AuthError::EmptyChallenge
            | AuthError::InvalidChallenge
            | AuthError::EmptySignature
            | AuthError::InvalidSignature { malformed: true } => ErrorKind::Validation,
            AuthError::InvalidSignature { malformed: false } => {
                ErrorKind::SignatureVerificationFailed
            }
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidPublicKey { .. } | AuthError::Storage(_) => ErrorKind::Storage,
        }
    }
}
