//! Content store: create, read and update of signed pastes.
//!
//! Validation order on writes (first failure wins):
//!
//! 1. Expiry window (create only): strictly future, at most `max_ttl`
//! 2. Ciphertext present and decodable
//! 3. Signature present, decodable, 64 bytes
//! 4. Public key present, decodable, 32 bytes
//! 5. Owner registered (create only)
//! 6. Signature verifies over the decoded ciphertext
//! 7. Single write
//!
//! Expiry is evaluated lazily on read; there is no sweeper.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dropkey_core::{Clock, Paste, PasteContent, PasteStore};
use dropkey_crypto::{
    decode_key, decode_payload, decode_signature, key_fingerprint, verify, CryptoError,
    PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};
use dropkey_identity::{IdentityRegistry, RegistryError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::PasteError;

/// Transport-encoded paste fields as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteSubmission {
    pub ciphertext: String,
    pub signature: String,
    pub public_key: String,
}

/// Submission after every field decoded.
struct Decoded {
    ciphertext: Vec<u8>,
    signature: [u8; SIGNATURE_LENGTH],
    public_key: [u8; PUBLIC_KEY_LENGTH],
}

impl PasteSubmission {
    fn decode(&self) -> Result<Decoded, PasteError> {
        let ciphertext = decode_payload(&self.ciphertext, "ciphertext").map_err(|e| match e {
            CryptoError::Empty { .. } => PasteError::EmptyCiphertext,
            _ => PasteError::InvalidCiphertext,
        })?;

        let signature = decode_signature(&self.signature).map_err(|e| match e {
            CryptoError::Empty { .. } => PasteError::EmptySignature,
            _ => PasteError::InvalidSignature,
        })?;

        let public_key = decode_key(&self.public_key).map_err(|_| PasteError::InvalidPublicKey)?;

        Ok(Decoded {
            ciphertext,
            signature,
            public_key,
        })
    }

    fn into_content(self) -> PasteContent {
        PasteContent {
            ciphertext: self.ciphertext,
            signature: self.signature,
            public_key: self.public_key,
        }
    }
}

/// Signed, time-bounded paste storage.
#[derive(Clone)]
pub struct ContentStore {
    pastes: Arc<dyn PasteStore>,
    registry: IdentityRegistry,
    clock: Arc<dyn Clock>,
    max_ttl_seconds: i64,
}

impl ContentStore {
    pub fn new(
        pastes: Arc<dyn PasteStore>,
        registry: IdentityRegistry,
        clock: Arc<dyn Clock>,
        max_ttl_seconds: i64,
    ) -> Self {
        Self {
            pastes,
            registry,
            clock,
            max_ttl_seconds,
        }
    }

    pub fn max_ttl_seconds(&self) -> i64 {
        self.max_ttl_seconds
    }

    /// Store a new paste that expires `ttl_seconds` from now.
    pub fn create(
        &self,
        submission: PasteSubmission,
        ttl_seconds: i64,
    ) -> Result<Paste, PasteError> {
        let now = self.clock.now();
        let expires_at = self.expiry_for(now, ttl_seconds)?;

        let decoded = submission.decode()?;
        let fingerprint = key_fingerprint(&decoded.public_key);

        match self.registry.get_by_public_key(&submission.public_key) {
            Ok(_) => {}
            Err(RegistryError::NotFound) => {
                info!(key = %fingerprint, "Paste rejected: owner not registered");
                return Err(PasteError::OwnerNotFound);
            }
            Err(RegistryError::Storage(e)) => {
                error!(key = %fingerprint, error = %e, "Owner lookup failed");
                return Err(PasteError::Storage(e));
            }
            Err(_) => return Err(PasteError::InvalidPublicKey),
        }

        if !verify(&decoded.public_key, &decoded.ciphertext, &decoded.signature) {
            warn!(key = %fingerprint, "Paste signature verification failed on create");
            return Err(PasteError::SignatureVerificationFailed);
        }

        let paste = Paste {
            id: Uuid::new_v4().to_string(),
            ciphertext: submission.ciphertext,
            signature: submission.signature,
            public_key: submission.public_key,
            expires_at,
        };

        self.pastes.insert_paste(&paste).map_err(|e| {
            error!(paste_id = %paste.id, error = %e, "Failed to persist paste");
            PasteError::Storage(e)
        })?;

        info!(
            paste_id = %paste.id,
            key = %fingerprint,
            expires_at = %paste.expires_at,
            "Paste created"
        );
        Ok(paste)
    }

    /// Fetch a live paste. Expired pastes report `Expired`, not `NotFound`.
    pub fn get_by_id(&self, id: &str) -> Result<Paste, PasteError> {
        validate_id(id)?;

        let paste = self.pastes.paste_by_id(id).map_err(|e| {
            if e.is_not_found() {
                PasteError::NotFound
            } else {
                error!(paste_id = %id, error = %e, "Failed to load paste");
                PasteError::Storage(e)
            }
        })?;

        if paste.is_expired_at(self.clock.now()) {
            debug!(paste_id = %id, expires_at = %paste.expires_at, "Paste has expired");
            return Err(PasteError::Expired);
        }

        Ok(paste)
    }

    /// Replace the content of an existing paste.
    ///
    /// Re-verifies the new signature but neither re-resolves the owner nor
    /// touches the expiry.
    pub fn update(&self, id: &str, submission: PasteSubmission) -> Result<(), PasteError> {
        validate_id(id)?;

        let decoded = submission.decode()?;

        if !verify(&decoded.public_key, &decoded.ciphertext, &decoded.signature) {
            warn!(
                paste_id = %id,
                key = %key_fingerprint(&decoded.public_key),
                "Paste signature verification failed on update"
            );
            return Err(PasteError::SignatureVerificationFailed);
        }

        self.pastes
            .update_paste_content(id, &submission.into_content())
            .map_err(|e| {
                if e.is_not_found() {
                    PasteError::NotFound
                } else {
                    error!(paste_id = %id, error = %e, "Failed to update paste");
                    PasteError::Storage(e)
                }
            })?;

        info!(paste_id = %id, "Paste updated");
        Ok(())
    }

    /// All live pastes owned by `public_key`, oldest first. An owner with
    /// only expired pastes gets an empty list.
    pub fn get_by_public_key(&self, public_key: &str) -> Result<Vec<Paste>, PasteError> {
        decode_key(public_key).map_err(|e| match e {
            CryptoError::Empty { .. } => PasteError::EmptyPublicKey,
            _ => PasteError::InvalidPublicKey,
        })?;

        match self.registry.get_by_public_key(public_key) {
            Ok(_) => {}
            Err(RegistryError::NotFound) => return Err(PasteError::OwnerNotFound),
            Err(RegistryError::Storage(e)) => return Err(PasteError::Storage(e)),
            Err(_) => return Err(PasteError::InvalidPublicKey),
        }

        let now = self.clock.now();
        let pastes = self.pastes.pastes_by_public_key(public_key).map_err(|e| {
            error!(error = %e, "Failed to list pastes by public key");
            PasteError::Storage(e)
        })?;

        Ok(pastes
            .into_iter()
            .filter(|p| !p.is_expired_at(now))
            .collect())
    }

    fn expiry_for(&self, now: DateTime<Utc>, ttl_seconds: i64) -> Result<DateTime<Utc>, PasteError> {
        if ttl_seconds <= 0 {
            return Err(PasteError::AlreadyExpired);
        }
        if ttl_seconds > self.max_ttl_seconds {
            return Err(PasteError::ExpiryTooLong {
                max_seconds: self.max_ttl_seconds,
            });
        }
        Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(PasteError::ExpiryTooLong {
                max_seconds: self.max_ttl_seconds,
            })
    }
}

fn validate_id(id: &str) -> Result<(), PasteError> {
    if id.trim().is_empty() || Uuid::parse_str(id).is_err() {
        return Err(PasteError::InvalidId { id: id.to_string() });
    }
    Ok(())
}
