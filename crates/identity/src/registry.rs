//! Identity registry: public key registration and lookup.
//!
//! Public keys are stored as their (canonical) transport strings, so key
//! uniqueness is string equality. Ids are UUID v4, generated here and never
//! reused.

use std::sync::Arc;

use dropkey_core::{Identity, IdentityStore, StorageError};
use dropkey_crypto::{decode_key, key_fingerprint, CryptoError};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::RegistryError;

/// Registers identities and resolves them by id or public key.
#[derive(Clone)]
pub struct IdentityRegistry {
    store: Arc<dyn IdentityStore>,
}

impl IdentityRegistry {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Register a public key and return the generated identity id.
    ///
    /// Persistence failures are logged and reported as `UserCreationFailed`;
    /// they are not retried.
    pub fn register(&self, public_key: &str) -> Result<String, RegistryError> {
        let key_bytes = validate_public_key(public_key)?;
        let fingerprint = key_fingerprint(&key_bytes);

        match self.store.identity_by_public_key(public_key) {
            Ok(_) => {
                info!(key = %fingerprint, "Registration rejected: public key already registered");
                return Err(RegistryError::DuplicateKey);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                error!(key = %fingerprint, error = %e, "Duplicate check failed during registration");
                return Err(RegistryError::UserCreationFailed(e));
            }
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            public_key: public_key.to_string(),
        };

        match self.store.insert_identity(&identity) {
            Ok(()) => {}
            // Lost a race against a concurrent registration of the same key
            Err(StorageError::Conflict { .. }) => return Err(RegistryError::DuplicateKey),
            Err(e) => {
                error!(key = %fingerprint, error = %e, "Failed to persist identity");
                return Err(RegistryError::UserCreationFailed(e));
            }
        }

        info!(identity_id = %identity.id, key = %fingerprint, "Identity registered");
        Ok(identity.id)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Identity, RegistryError> {
        if id.trim().is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if Uuid::parse_str(id).is_err() {
            return Err(RegistryError::InvalidId { id: id.to_string() });
        }

        self.store.identity_by_id(id).map_err(|e| {
            if e.is_not_found() {
                RegistryError::NotFound
            } else {
                RegistryError::Storage(e)
            }
        })
    }

    /// Resolve the identity owning `public_key`.
    ///
    /// Callers only ever see `NotFound` for an unknown key; the debug log
    /// records which case it was.
    pub fn get_by_public_key(&self, public_key: &str) -> Result<Identity, RegistryError> {
        let key_bytes = validate_public_key(public_key).map_err(|e| {
            debug!(error = %e, "Identity lookup with malformed public key");
            e
        })?;

        self.store.identity_by_public_key(public_key).map_err(|e| {
            if e.is_not_found() {
                debug!(key = %key_fingerprint(&key_bytes), "No identity for public key");
                RegistryError::NotFound
            } else {
                error!(error = %e, "Identity lookup by public key failed");
                RegistryError::Storage(e)
            }
        })
    }
}

fn validate_public_key(public_key: &str) -> Result<[u8; 32], RegistryError> {
    decode_key(public_key).map_err(|e| match e {
        CryptoError::Empty { .. } => RegistryError::EmptyPublicKey,
        e => RegistryError::InvalidPublicKey(e),
    })
}
