//! Client-side signing helpers.
//!
//! The service never holds private keys. These helpers exist for clients and
//! tests that need to produce the material the validator accepts: a
//! transport-encoded public key and signatures over raw payload bytes.

use ed25519_dalek::{Signer, SigningKey};
use rand::RngCore;
use zeroize::Zeroize;

use crate::validator::encode;

/// Generate a fresh Ed25519 signing key from the OS-seeded thread RNG.
pub fn generate_keypair() -> SigningKey {
    let mut secret_key_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret_key_bytes);

    let signing_key = SigningKey::from_bytes(&secret_key_bytes);
    secret_key_bytes.zeroize();

    signing_key
}

/// Transport-encoded public half of `signing_key`.
pub fn encode_public_key(signing_key: &SigningKey) -> String {
    encode(signing_key.verifying_key().as_bytes())
}

/// Sign raw payload bytes and return the transport-encoded signature.
///
/// For pastes the payload is the decoded ciphertext; for authentication it
/// is the decoded challenge.
pub fn sign_payload(signing_key: &SigningKey, payload: &[u8]) -> String {
    encode(&signing_key.sign(payload).to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{decode_key, decode_signature, verify};

    #[test]
    fn test_generated_keys_differ() {
        let a = generate_keypair();
        let b = generate_keypair();
        assert_ne!(a.verifying_key(), b.verifying_key());
    }

    #[test]
    fn test_signature_verifies_through_validator() {
        let key = generate_keypair();
        let public_key = decode_key(&encode_public_key(&key)).unwrap();
        let signature = decode_signature(&sign_payload(&key, b"Test")).unwrap();

        assert!(verify(&public_key, b"Test", &signature));
        assert!(!verify(&public_key, b"Text", &signature));
    }

    #[test]
    fn test_signature_from_other_key_fails() {
        let signer = generate_keypair();
        let other = generate_keypair();
        let public_key = decode_key(&encode_public_key(&other)).unwrap();
        let signature = decode_signature(&sign_payload(&signer, b"challenge")).unwrap();

        assert!(!verify(&public_key, b"challenge", &signature));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let key = generate_keypair();
        assert_eq!(sign_payload(&key, b"abc"), sign_payload(&key, b"abc"));
    }
}
