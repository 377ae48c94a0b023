//! File-backed storage and shared-handle concurrency.

use std::sync::{Arc, Barrier};
use std::thread;

use dropkey_crypto::{encode_public_key, generate_keypair};
use dropkey_identity::RegistryError;

use crate::test_utils::*;

#[test]
fn test_state_survives_reopen() {
    let h = Harness::new();
    let alice = h.user();
    let created = h.pastes.create(alice.submission(b"durable"), 600).unwrap();

    let h = h.reopen();
    assert_eq!(h.registry.get_by_id(&alice.id).unwrap().public_key, alice.public_key());
    assert_eq!(h.pastes.get_by_id(&created.id).unwrap(), created);

    let (signature, challenge) = alice.prove(b"after restart");
    assert!(h
        .authenticator
        .authenticate(&alice.id, &signature, &challenge)
        .is_ok());
}

#[test]
fn test_concurrent_registration_of_one_key() {
    let h = Harness::new();
    let public_key = encode_public_key(&generate_keypair());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = h.registry.clone();
            let public_key = public_key.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.register(&public_key)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, RegistryError::DuplicateKey)));
}

#[test]
fn test_concurrent_creates_all_land() {
    let h = Harness::new();
    let alice = Arc::new(h.user());
    let threads = 8;

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let pastes = h.pastes.clone();
            let alice = alice.clone();
            thread::spawn(move || {
                pastes
                    .create(alice.submission(format!("paste {i}").as_bytes()), 60)
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), threads);

    let listed = h.pastes.get_by_public_key(&alice.public_key()).unwrap();
    assert_eq!(listed.len(), threads);
}
