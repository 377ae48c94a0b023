//! Validator error types.

use dropkey_core::ErrorKind;
use thiserror::Error;

/// Reasons transport-encoded material is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Blank input.
    #[error("{what} is empty")]
    Empty { what: &'static str },

    /// Not valid standard base64.
    #[error("{what} is not valid base64")]
    InvalidEncoding { what: &'static str },

    /// Decoded public key is not 32 bytes.
    #[error("invalid public key size: {actual} bytes (expected 32)")]
    InvalidKeySize { actual: usize },

    /// Decoded signature is not 64 bytes.
    #[error("invalid signature size: {actual} bytes (expected 64)")]
    InvalidSignatureSize { actual: usize },
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CryptoError::Empty { .. })
    }
}
