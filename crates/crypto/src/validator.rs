//! Decoding and verification of transport-encoded Ed25519 material.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::CryptoError;

pub use ed25519_dalek::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

fn decode_non_blank(material: &str, what: &'static str) -> Result<Vec<u8>, CryptoError> {
    if material.trim().is_empty() {
        return Err(CryptoError::Empty { what });
    }
    STANDARD
        .decode(material)
        .map_err(|_| CryptoError::InvalidEncoding { what })
}

/// Decode a transport-encoded Ed25519 public key.
///
/// Only the encoding and the length are checked; whether the bytes are a
/// valid curve point is decided by [`verify`].
pub fn decode_key(material: &str) -> Result<[u8; PUBLIC_KEY_LENGTH], CryptoError> {
    let bytes = decode_non_blank(material, "public key")?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKeySize { actual })
}

/// Decode a transport-encoded Ed25519 signature.
pub fn decode_signature(material: &str) -> Result<[u8; SIGNATURE_LENGTH], CryptoError> {
    let bytes = decode_non_blank(material, "signature")?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidSignatureSize { actual })
}

/// Decode an arbitrary-length blob (ciphertext, challenge).
pub fn decode_payload(material: &str, what: &'static str) -> Result<Vec<u8>, CryptoError> {
    decode_non_blank(material, what)
}

/// Transport-encode raw bytes.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Check `signature` over `message` under `public_key`.
///
/// Pure: returns `false` for a bad signature and for key bytes that are not
/// a valid Ed25519 point.
pub fn verify(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    message: &[u8],
    signature: &[u8; SIGNATURE_LENGTH],
) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let signature = Signature::from_bytes(signature);
    verifying_key.verify(message, &signature).is_ok()
}

/// Short stable identifier for a public key, safe to log.
pub fn key_fingerprint(public_key: &[u8]) -> String {
    let hash = blake3::hash(public_key);
    hex::encode(&hash.as_bytes()[..8])
}
