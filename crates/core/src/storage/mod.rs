//! Persistence collaborator interfaces.
//!
//! The services own every validation rule; stores only move records in and
//! out. A store reports "no rows" as [`StorageError::NotFound`] and a
//! uniqueness violation as [`StorageError::Conflict`].
//!
//! [`StorageError::NotFound`]: crate::error::StorageError::NotFound
//! [`StorageError::Conflict`]: crate::error::StorageError::Conflict

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crate::error::StorageResult;
use crate::types::{Identity, Paste};

/// Identity persistence.
pub trait IdentityStore: Send + Sync {
    /// Insert a new identity. Fails with `Conflict` if the id or public key
    /// is already present.
    fn insert_identity(&self, identity: &Identity) -> StorageResult<()>;

    fn identity_by_id(&self, id: &str) -> StorageResult<Identity>;

    fn identity_by_public_key(&self, public_key: &str) -> StorageResult<Identity>;
}

/// The columns an update is allowed to replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteContent {
    pub ciphertext: String,
    pub signature: String,
    pub public_key: String,
}

/// Paste persistence.
pub trait PasteStore: Send + Sync {
    fn insert_paste(&self, paste: &Paste) -> StorageResult<()>;

    /// Fetch a paste regardless of expiry; expiry is the caller's decision.
    fn paste_by_id(&self, id: &str) -> StorageResult<Paste>;

    /// All pastes for a public key in creation order, expired ones included.
    fn pastes_by_public_key(&self, public_key: &str) -> StorageResult<Vec<Paste>>;

    /// Replace ciphertext, signature and public key of an existing paste.
    /// `expires_at` is never touched. Fails with `NotFound` if no row matched.
    fn update_paste_content(&self, id: &str, content: &PasteContent) -> StorageResult<()>;
}
