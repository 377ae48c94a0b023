//! Persisted records.
//!
//! Key, signature and ciphertext fields hold the transport (base64) strings
//! exactly as they were validated; decoding is the crypto crate's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered public key with its generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// UUID v4, assigned once at registration
    #[serde(rename = "user_id")]
    pub id: String,
    /// Ed25519 public key, unique across identities
    pub public_key: String,
}

/// An opaque, signed, time-bounded blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    /// UUID v4, assigned at creation
    pub id: String,
    pub ciphertext: String,
    /// Ed25519 signature over the decoded ciphertext bytes
    pub signature: String,
    /// Owner's public key
    pub public_key: String,
    /// Absolute expiry, whole seconds
    pub expires_at: DateTime<Utc>,
}

impl Paste {
    /// A paste is logically absent once `now` reaches its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
