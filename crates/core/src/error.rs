//! Core error types.
//!
//! [`ErrorKind`] is the closed classification every component error maps
//! onto. Callers (the HTTP boundary, telemetry) branch on the kind, never on
//! message text.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of every failure a DropKey operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input. Caller fault, never retried.
    Validation,
    /// The entity never existed.
    NotFound,
    /// The entity existed but its expiry has lapsed.
    Expired,
    /// The public key on a write does not belong to a registered identity.
    OwnerNotFound,
    /// Well-formed input that failed cryptographic verification.
    SignatureVerificationFailed,
    /// Uniqueness violation.
    Conflict,
    /// Persistence failure or corrupted stored data. Opaque to callers.
    Storage,
}

impl ErrorKind {
    /// Stable snake_case name, used as a log field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Expired => "expired",
            ErrorKind::OwnerNotFound => "owner_not_found",
            ErrorKind::SignatureVerificationFailed => "signature_verification_failed",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by the persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The query matched no rows.
    #[error("Record not found: {table} {key}")]
    NotFound { table: &'static str, key: String },

    /// A UNIQUE constraint rejected the write.
    #[error("Unique constraint violated on {table}")]
    Conflict { table: &'static str },

    /// Stored data could not be decoded into a record.
    #[error("Corrupt record in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection lock was poisoned by a panicking writer.
    #[error("Storage handle unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::NotFound { .. } => ErrorKind::NotFound,
            StorageError::Conflict { .. } => ErrorKind::Conflict,
            _ => ErrorKind::Storage,
        }
    }

    /// True for the "no rows" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
