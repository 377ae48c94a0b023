//! Paste round trips, integrity and expiry across the full component stack.

use chrono::Duration;
use dropkey_core::config::DEFAULT_MAX_TTL_SECONDS;
use dropkey_core::{Clock, ErrorKind};
use dropkey_crypto::{encode, sign_payload};
use dropkey_paste::{PasteError, PasteSubmission};

use crate::test_utils::*;

#[test]
fn test_signed_paste_round_trip() {
    let h = Harness::new();
    let alice = h.user();

    let cases: [&[u8]; 3] = [b"Test", b"\x00\xffbinary", &[42u8; 4096]];
    for plaintext in cases {
        let submission = alice.submission(plaintext);
        let created = h.pastes.create(submission.clone(), 60).unwrap();
        let fetched = h.pastes.get_by_id(&created.id).unwrap();
        assert_eq!(fetched.ciphertext, submission.ciphertext);
        assert_eq!(fetched.signature, submission.signature);
        assert_eq!(fetched.public_key, submission.public_key);
    }
}

#[test]
fn test_concrete_test_paste() {
    let h = Harness::new();
    let alice = h.user();

    let submission = PasteSubmission {
        ciphertext: "VGVzdA==".to_string(),
        signature: sign_payload(&alice.key, b"Test"),
        public_key: alice.public_key(),
    };
    let created = h.pastes.create(submission, 3600).unwrap();

    let fetched = h.pastes.get_by_id(&created.id).unwrap();
    assert_eq!(fetched.ciphertext, "VGVzdA==");
    assert_eq!(fetched.expires_at, h.clock.now() + Duration::seconds(3600));
}

#[test]
fn test_unverifiable_signature_persists_nothing() {
    let h = Harness::new();
    let alice = h.user();
    let mallory = h.user();

    let forged = PasteSubmission {
        ciphertext: encode(b"Test"),
        signature: sign_payload(&mallory.key, b"Test"),
        public_key: alice.public_key(),
    };
    let err = h.pastes.create(forged, 60).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureVerificationFailed);

    assert!(h.pastes.get_by_public_key(&alice.public_key()).unwrap().is_empty());
}

#[test]
fn test_read_idempotence() {
    let h = Harness::new();
    let alice = h.user();
    let created = h.pastes.create(alice.submission(b"stable"), 60).unwrap();

    let first = h.pastes.get_by_id(&created.id).unwrap();
    let second = h.pastes.get_by_id(&created.id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_expiry_boundary_on_simulated_clock() {
    let h = Harness::new();
    let alice = h.user();
    let ttl = 3600;
    let created = h.pastes.create(alice.submission(b"ttl"), ttl).unwrap();

    h.clock.advance(Duration::seconds(ttl - 1));
    assert!(h.pastes.get_by_id(&created.id).is_ok());

    h.clock.advance(Duration::seconds(2));
    let err = h.pastes.get_by_id(&created.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);
}

#[test]
fn test_seven_day_limit() {
    let h = Harness::new();
    let alice = h.user();

    assert_eq!(DEFAULT_MAX_TTL_SECONDS, 7 * 24 * 3600);
    assert!(h
        .pastes
        .create(alice.submission(b"week"), DEFAULT_MAX_TTL_SECONDS)
        .is_ok());

    let err = h
        .pastes
        .create(alice.submission(b"week+1"), DEFAULT_MAX_TTL_SECONDS + 1)
        .unwrap_err();
    assert!(matches!(err, PasteError::ExpiryTooLong { .. }));
}

#[test]
fn test_listing_returns_only_live_pastes() {
    let h = Harness::new();
    let alice = h.user();
    let bob = h.user();

    let expiring = h.pastes.create(alice.submission(b"soon"), 10).unwrap();
    let live = h.pastes.create(alice.submission(b"later"), 1000).unwrap();
    h.pastes.create(bob.submission(b"bob's"), 1000).unwrap();

    h.clock.advance(Duration::seconds(10));
    let listed = h.pastes.get_by_public_key(&alice.public_key()).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, live.id);
    assert!(matches!(
        h.pastes.get_by_id(&expiring.id).unwrap_err(),
        PasteError::Expired
    ));
}

#[test]
fn test_update_keeps_expiry_and_reverifies() {
    let h = Harness::new();
    let alice = h.user();
    let created = h.pastes.create(alice.submission(b"v1"), 100).unwrap();

    h.pastes.update(&created.id, alice.submission(b"v2")).unwrap();
    let fetched = h.pastes.get_by_id(&created.id).unwrap();
    assert_eq!(fetched.ciphertext, encode(b"v2"));
    assert_eq!(fetched.expires_at, created.expires_at);

    let mut bad = alice.submission(b"v3");
    bad.ciphertext = encode(b"v4");
    let err = h.pastes.update(&created.id, bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureVerificationFailed);
}

#[test]
fn test_create_for_unregistered_owner() {
    let h = Harness::new();
    let stranger = TestUser {
        id: String::new(),
        key: dropkey_crypto::generate_keypair(),
    };

    let err = h.pastes.create(stranger.submission(b"hi"), 60).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OwnerNotFound);
}
