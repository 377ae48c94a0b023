//! Challenge–response authentication.
//!
//! A caller proves possession of a registered key by signing a challenge of
//! its own choosing. Verification is a single synchronous call with no
//! persisted intermediate state:
//!
//! 1. Structural checks: user id, challenge, signature present; signature
//!    decodes to 64 bytes
//! 2. Resolve the identity by id
//! 3. Decode the stored public key (failure means corrupted data)
//! 4. Decode the challenge
//! 5. Verify the signature over the decoded challenge bytes
//!
//! Checks run in that order and stop at the first failure, so structural
//! errors never cost a storage round trip.

use dropkey_core::Identity;
use dropkey_crypto::{decode_key, decode_payload, decode_signature, key_fingerprint, verify};
use tracing::{debug, error, warn};

use crate::error::{AuthError, RegistryError};
use crate::registry::IdentityRegistry;

/// An identity whose key possession has just been proven.
///
/// Only [`Authenticator::authenticate`] constructs this, so holding one means
/// the signature check passed. The boundary layer turns it into a bearer
/// credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity(Identity);

impl VerifiedIdentity {
    pub(crate) fn new(identity: Identity) -> Self {
        Self(identity)
    }

    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn public_key(&self) -> &str {
        &self.0.public_key
    }

    pub fn into_identity(self) -> Identity {
        self.0
    }
}

/// Stateless challenge–response verifier.
#[derive(Clone)]
pub struct Authenticator {
    registry: IdentityRegistry,
}

impl Authenticator {
    pub fn new(registry: IdentityRegistry) -> Self {
        Self { registry }
    }

    /// Verify that `signature` is the identity's signature over `challenge`.
    ///
    /// All three inputs are transport-encoded. The same proof verifies every
    /// time it is presented; there is no nonce store.
    #[must_use = "authentication result must be checked"]
    pub fn authenticate(
        &self,
        user_id: &str,
        signature: &str,
        challenge: &str,
    ) -> Result<VerifiedIdentity, AuthError> {
        if user_id.trim().is_empty() {
            return Err(AuthError::EmptyUserId);
        }
        if challenge.trim().is_empty() {
            return Err(AuthError::EmptyChallenge);
        }
        if signature.trim().is_empty() {
            return Err(AuthError::EmptySignature);
        }
        let signature_bytes =
            decode_signature(signature).map_err(|_| AuthError::InvalidSignature { malformed: true })?;

        let identity = self.registry.get_by_id(user_id).map_err(|e| match e {
            RegistryError::Storage(e) => {
                error!(user_id, error = %e, "Identity lookup failed during authentication");
                AuthError::Storage(e)
            }
            _ => {
                debug!(user_id, "Authentication for unknown identity");
                AuthError::UserNotFound
            }
        })?;

        let public_key = decode_key(&identity.public_key).map_err(|e| {
            error!(
                user_id = %identity.id,
                error = %e,
                "Stored public key is corrupt"
            );
            AuthError::InvalidPublicKey {
                user_id: identity.id.clone(),
            }
        })?;

        let challenge_bytes =
            decode_payload(challenge, "challenge").map_err(|_| AuthError::InvalidChallenge)?;

        if !verify(&public_key, &challenge_bytes, &signature_bytes) {
            warn!(
                user_id = %identity.id,
                key = %key_fingerprint(&public_key),
                "Challenge signature verification failed"
            );
            return Err(AuthError::InvalidSignature { malformed: false });
        }

        debug!(user_id = %identity.id, "Identity authenticated");
        Ok(VerifiedIdentity::new(identity))
    }
}
