//! Error types for paste operations.

use dropkey_core::{ErrorKind, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("paste has already expired")]
    AlreadyExpired,

    #[error("paste expiry is too long (max {max_seconds} seconds)")]
    ExpiryTooLong { max_seconds: i64 },

    #[error("paste has empty ciphertext")]
    EmptyCiphertext,

    #[error("paste ciphertext is not base64 encoded")]
    InvalidCiphertext,

    #[error("paste has empty signature")]
    EmptySignature,

    #[error("paste signature is not base64 encoded or has invalid size")]
    InvalidSignature,

    #[error("public key is empty")]
    EmptyPublicKey,

    #[error("paste has empty or invalid public key")]
    InvalidPublicKey,

    #[error("no identity is registered for this public key")]
    OwnerNotFound,

    #[error("signature does not verify against the ciphertext")]
    SignatureVerificationFailed,

    #[error("invalid paste id: {id:?}")]
    InvalidId { id: String },

    #[error("paste not found")]
    NotFound,

    #[error("paste has expired")]
    Expired,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl PasteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PasteError::AlreadyExpired
            | PasteError::ExpiryTooLong { .. }
            | PasteError::EmptyCiphertext
            | PasteError::InvalidCiphertext
            | PasteError::EmptySignature
            | PasteError::InvalidSignature
            | PasteError::EmptyPublicKey
            | PasteError::InvalidPublicKey
            | PasteError::InvalidId { .. } => ErrorKind::Validation,
            PasteError::OwnerNotFound => ErrorKind::OwnerNotFound,
            PasteError::SignatureVerificationFailed => ErrorKind::SignatureVerificationFailed,
            PasteError::NotFound => ErrorKind::NotFound,
            PasteError::Expired => ErrorKind::Expired,
            PasteError::Storage(_) => ErrorKind::Storage,
        }
    }
}
