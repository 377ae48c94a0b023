//! Registration and challenge–response authentication end to end.

use dropkey_core::ErrorKind;
use dropkey_crypto::{encode_public_key, generate_keypair, sign_payload};
use dropkey_identity::{AuthError, RegistryError};

use crate::test_utils::*;

#[test]
fn test_matching_keypair_authenticates() {
    let h = Harness::new();
    let alice = h.user();
    let (signature, challenge) = alice.prove(b"nonce-from-client");

    let verified = h
        .authenticator
        .authenticate(&alice.id, &signature, &challenge)
        .unwrap();
    assert_eq!(verified.id(), alice.id);
    assert_eq!(verified.public_key(), alice.public_key());
}

#[test]
fn test_other_private_key_fails() {
    let h = Harness::new();
    let alice = h.user();
    let (_, challenge) = alice.prove(b"nonce");
    let signature = sign_payload(&generate_keypair(), b"nonce");

    let err = h
        .authenticator
        .authenticate(&alice.id, &signature, &challenge)
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidSignature { malformed: false }));
    assert_eq!(err.kind(), ErrorKind::SignatureVerificationFailed);
}

#[test]
fn test_proof_for_one_identity_does_not_open_another() {
    let h = Harness::new();
    let alice = h.user();
    let bob = h.user();
    let (signature, challenge) = alice.prove(b"nonce");

    let err = h
        .authenticator
        .authenticate(&bob.id, &signature, &challenge)
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidSignature { .. }));
}

#[test]
fn test_duplicate_registration() {
    let h = Harness::new();
    let public_key = encode_public_key(&generate_keypair());

    assert!(h.registry.register(&public_key).is_ok());
    let err = h.registry.register(&public_key).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateKey));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_captured_proof_replays() {
    // No nonce store: a captured proof remains valid.
    let h = Harness::new();
    let alice = h.user();
    let (signature, challenge) = alice.prove(b"captured");

    assert!(h
        .authenticator
        .authenticate(&alice.id, &signature, &challenge)
        .is_ok());
    assert!(h
        .authenticator
        .authenticate(&alice.id, &signature, &challenge)
        .is_ok());
}
