//! Cryptographic validation for DropKey.
//!
//! Every raw key, signature, ciphertext or challenge string crosses into the
//! services through this crate before it is treated as cryptographic
//! material.
//!
//! # Supported Algorithms
//!
//! - **Signatures**: Ed25519 (32-byte public keys, 64-byte signatures)
//! - **Transport encoding**: standard base64 with padding, decoded strictly
//! - **Fingerprints**: BLAKE3, for logging keys without logging keys
//!
//! # Security Principles
//!
//! - This crate verifies; it never decrypts payloads
//! - Verification is pure and deterministic
//! - Keys, signatures and ciphertext are never logged

pub mod error;
pub mod signing;
pub mod validator;

pub use error::CryptoError;
pub use signing::{encode_public_key, generate_keypair, sign_payload};
pub use validator::{
    decode_key, decode_payload, decode_signature, encode, key_fingerprint, verify,
    PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};

pub use ed25519_dalek::{SigningKey, VerifyingKey};
