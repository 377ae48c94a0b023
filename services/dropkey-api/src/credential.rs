//! Bearer credentials issued after a successful challenge–response.
//!
//! Format: `base64url(claims JSON) "." base64url(MAC)`, where the MAC is a
//! BLAKE3 keyed hash of the encoded claims under a 32-byte server secret.
//! Credentials are stateless; nothing is stored and nothing is revoked
//! before `exp`.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use dropkey_core::Clock;
use dropkey_identity::VerifiedIdentity;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Secret size for the keyed hash.
pub const SECRET_LENGTH: usize = blake3::KEY_LEN;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("token secret must be 32 hex-encoded bytes")]
    InvalidSecret,

    #[error("malformed credential")]
    Malformed,

    #[error("credential MAC does not match")]
    BadMac,

    #[error("credential has expired")]
    Expired,

    #[error("credential lifetime of {ttl_seconds} seconds is out of range")]
    LifetimeOutOfRange { ttl_seconds: i64 },

    #[error("failed to encode claims: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Claims carried by a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity id
    pub sub: String,
    pub public_key: String,
    /// Expiry, Unix seconds
    pub exp: i64,
}

/// Mints and checks bearer credentials.
#[derive(Clone)]
pub struct CredentialIssuer {
    secret: Arc<Zeroizing<[u8; SECRET_LENGTH]>>,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl CredentialIssuer {
    pub fn new(secret: [u8; SECRET_LENGTH], ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: Arc::new(Zeroizing::new(secret)),
            ttl_seconds,
            clock,
        }
    }

    /// Build from the hex secret found in configuration.
    pub fn from_hex(
        secret_hex: &str,
        ttl_seconds: i64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CredentialError> {
        let bytes = Zeroizing::new(
            hex::decode(secret_hex.trim()).map_err(|_| CredentialError::InvalidSecret)?,
        );
        let secret: [u8; SECRET_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CredentialError::InvalidSecret)?;
        Ok(Self::new(secret, ttl_seconds, clock))
    }

    pub fn issue(&self, identity: &VerifiedIdentity) -> Result<String, CredentialError> {
        let exp = self
            .clock
            .now()
            .timestamp()
            .checked_add(self.ttl_seconds)
            .ok_or(CredentialError::LifetimeOutOfRange {
                ttl_seconds: self.ttl_seconds,
            })?;
        let claims = Claims {
            sub: identity.id().to_string(),
            public_key: identity.public_key().to_string(),
            exp,
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let mac = blake3::keyed_hash(&self.secret, payload.as_bytes());

        Ok(format!(
            "{payload}.{}",
            URL_SAFE_NO_PAD.encode(mac.as_bytes())
        ))
    }

    /// Check the MAC, then the expiry, and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        let (payload, mac) = token.split_once('.').ok_or(CredentialError::Malformed)?;

        let mac_bytes: [u8; blake3::OUT_LEN] = URL_SAFE_NO_PAD
            .decode(mac)
            .map_err(|_| CredentialError::Malformed)?
            .try_into()
            .map_err(|_| CredentialError::Malformed)?;

        // blake3::Hash equality is constant time
        let expected = blake3::keyed_hash(&self.secret, payload.as_bytes());
        if expected != blake3::Hash::from(mac_bytes) {
            return Err(CredentialError::BadMac);
        }

        let claims: Claims = URL_SAFE_NO_PAD
            .decode(payload)
            .ok()
            .and_then(|json| serde_json::from_slice(&json).ok())
            .ok_or(CredentialError::Malformed)?;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(CredentialError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use dropkey_core::{ManualClock, SqliteStore};
    use dropkey_crypto::{encode, encode_public_key, generate_keypair, sign_payload};
    use dropkey_identity::{Authenticator, IdentityRegistry};

    fn verified() -> VerifiedIdentity {
        let registry = IdentityRegistry::new(Arc::new(SqliteStore::open_in_memory().unwrap()));
        let key = generate_keypair();
        let id = registry.register(&encode_public_key(&key)).unwrap();
        Authenticator::new(registry)
            .authenticate(&id, &sign_payload(&key, b"hello"), &encode(b"hello"))
            .unwrap()
    }

    fn issuer(clock: Arc<ManualClock>) -> CredentialIssuer {
        CredentialIssuer::new([7u8; SECRET_LENGTH], 60, clock)
    }

    #[test]
    fn test_issue_then_verify() {
        let clock = Arc::new(ManualClock::starting_now());
        let issuer = issuer(clock.clone());
        let identity = verified();

        let claims = issuer.verify(&issuer.issue(&identity).unwrap()).unwrap();
        assert_eq!(claims.sub, identity.id());
        assert_eq!(claims.public_key, identity.public_key());
        assert_eq!(claims.exp, clock.now().timestamp() + 60);
    }

    #[test]
    fn test_expired_credential() {
        let clock = Arc::new(ManualClock::starting_now());
        let issuer = issuer(clock.clone());
        let token = issuer.issue(&verified()).unwrap();

        clock.advance(Duration::seconds(60));
        assert!(matches!(
            issuer.verify(&token).unwrap_err(),
            CredentialError::Expired
        ));
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let clock = Arc::new(ManualClock::starting_now());
        let issuer = issuer(clock);
        let token = issuer.issue(&verified()).unwrap();
        let (_, mac) = token.split_once('.').unwrap();

        let forged = Claims {
            sub: "someone-else".to_string(),
            public_key: "AAAA".to_string(),
            exp: i64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());

        assert!(matches!(
            issuer.verify(&format!("{forged_payload}.{mac}")).unwrap_err(),
            CredentialError::BadMac
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let clock = Arc::new(ManualClock::starting_now());
        let token = issuer(clock.clone()).issue(&verified()).unwrap();
        let other = CredentialIssuer::new([8u8; SECRET_LENGTH], 60, clock);

        assert!(matches!(
            other.verify(&token).unwrap_err(),
            CredentialError::BadMac
        ));
    }

    #[test]
    fn test_unrepresentable_lifetime_is_an_error() {
        let issuer = CredentialIssuer::new(
            [7u8; SECRET_LENGTH],
            i64::MAX,
            Arc::new(ManualClock::starting_now()),
        );
        assert!(matches!(
            issuer.issue(&verified()).unwrap_err(),
            CredentialError::LifetimeOutOfRange { .. }
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        let issuer = issuer(Arc::new(ManualClock::starting_now()));
        for token in ["", "no-dot", "a.b", "a.!!!"] {
            assert!(matches!(
                issuer.verify(token).unwrap_err(),
                CredentialError::Malformed
            ));
        }
    }

    #[test]
    fn test_from_hex_requires_32_bytes() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_now());
        assert!(CredentialIssuer::from_hex(&"ab".repeat(32), 60, clock.clone()).is_ok());
        assert!(CredentialIssuer::from_hex("abcd", 60, clock.clone()).is_err());
        assert!(CredentialIssuer::from_hex("", 60, clock.clone()).is_err());
        assert!(CredentialIssuer::from_hex("zz", 60, clock).is_err());
    }
}
