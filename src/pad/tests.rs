// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Tests for the PAD engine: the STR chain, the snapshot window, and
//! visibility of staged writes.

use super::*;
use crate::test_utils::{seeded_rng, static_signing_key, static_vrf_key};
use crate::tree::ProofType;

/// Minimal associated data for engine tests.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TestAd(Vec<u8>);

impl AssocData for TestAd {
    fn bytes(&self) -> Vec<u8> {
        self.0.clone()
    }
}

fn test_pad(capacity: usize) -> Pad<TestAd> {
    Pad::with_rng(
        &mut seeded_rng(1),
        TestAd(b"ad v1".to_vec()),
        static_signing_key(),
        static_vrf_key(),
        capacity,
    )
    .unwrap()
}

#[test]
fn test_rejects_zero_capacity() {
    let result = Pad::new(
        TestAd(Vec::new()),
        static_signing_key(),
        static_vrf_key(),
        0,
    );
    assert!(matches!(result, Err(PadError::InvalidCapacity)));
}

#[test]
fn test_genesis_str() {
    let pad = test_pad(10);
    let genesis = pad.latest_str();

    assert_eq!(genesis.epoch, 0);
    assert_eq!(genesis.previous_epoch, 0);
    assert_eq!(genesis.previous_str_hash, None);
    assert!(genesis.verify(&pad.signing_public_key()));

    // The genesis serialization omits the previous-epoch and previous-hash
    // fields entirely.
    assert_eq!(genesis.serialize_internal().len(), 8 + 32);
}

#[test]
fn test_hash_chain_over_many_epochs() {
    let mut pad = test_pad(100);
    let public_key = pad.signing_public_key();
    let mut saved = pad.latest_str().clone();

    for epoch in 1..50u64 {
        pad.update(None);
        let root = pad.latest_str().clone();
        assert_eq!(root.epoch, epoch, "epochs aren't increasing");
        assert!(root.verify(&public_key), "invalid signature at epoch {epoch}");
        assert!(root.verify_hash_chain(&saved), "broken chain at epoch {epoch}");
        saved = root;
    }
}

#[test]
fn test_chain_rejects_tampered_signature() {
    let mut pad = test_pad(10);
    pad.update(None);
    let mut saved = pad.latest_str().clone();
    pad.update(None);
    let root = pad.latest_str().clone();

    assert!(root.verify_hash_chain(&saved));
    for byte in 0..saved.signature.len() {
        saved.signature[byte] ^= 0x01;
        assert!(!root.verify_hash_chain(&saved), "byte {byte}");
        saved.signature[byte] ^= 0x01;
    }

    // Non-consecutive epochs do not chain either.
    let genesis = pad.get_str(0).unwrap();
    assert!(!root.verify_hash_chain(genesis));
    assert!(!genesis.verify_hash_chain(&root));
}

#[test]
fn test_staged_writes_are_invisible_until_update() {
    let mut pad = test_pad(10);
    let alice = Name::from("alice");
    pad.set(&alice, Value::from("k1"));

    // Still absent from the latest snapshot...
    let path = pad.lookup(&alice);
    assert_eq!(path.proof_type(), ProofType::Absence);
    assert!(path.verify(&pad.latest_str().tree_hash));

    // ...and included after the epoch advances.
    pad.update(None);
    let path = pad.lookup(&alice);
    assert_eq!(path.proof_type(), ProofType::Inclusion);
    assert!(path.verify(&pad.latest_str().tree_hash));
    assert!(path.verify_binding(b"alice", b"k1"));
}

#[test]
fn test_lookup_in_past_epochs() {
    let mut pad = test_pad(10);
    let alice = Name::from("alice");
    pad.set(&alice, Value::from("k1"));
    pad.update(None);
    pad.set(&alice, Value::from("k2"));
    pad.update(None);

    // Epoch 0: absent. Epoch 1: k1. Epoch 2: k2.
    let epoch0 = pad.lookup_in_epoch(&alice, 0).unwrap();
    assert_eq!(epoch0.proof_type(), ProofType::Absence);
    assert!(epoch0.verify(&pad.get_str(0).unwrap().tree_hash));

    let epoch1 = pad.lookup_in_epoch(&alice, 1).unwrap();
    assert!(epoch1.verify_binding(b"alice", b"k1"));
    assert!(epoch1.verify(&pad.get_str(1).unwrap().tree_hash));

    let epoch2 = pad.lookup_in_epoch(&alice, 2).unwrap();
    assert!(epoch2.verify_binding(b"alice", b"k2"));
    assert!(epoch2.verify(&pad.get_str(2).unwrap().tree_hash));

    assert_eq!(
        pad.lookup_in_epoch(&alice, 3),
        Err(PadError::EpochOutOfWindow {
            epoch: 3,
            oldest: 0,
            latest: 2
        })
    );
}

#[test]
fn test_snapshot_eviction() {
    let mut pad = test_pad(3);
    for _ in 0..5 {
        pad.update(None);
    }

    assert_eq!(pad.latest_epoch(), 5);
    assert_eq!(pad.oldest_epoch(), 3);
    assert!(pad.get_str(2).is_none());
    assert!(pad.get_str(3).is_some());

    let err = pad.lookup_in_epoch(&Name::from("alice"), 1).unwrap_err();
    assert_eq!(
        err,
        PadError::EpochOutOfWindow {
            epoch: 1,
            oldest: 3,
            latest: 5
        }
    );
}

#[test]
fn test_update_signs_the_given_ad() {
    let mut pad = test_pad(10);
    assert_eq!(pad.latest_str().ad, TestAd(b"ad v1".to_vec()));

    pad.update(Some(TestAd(b"ad v2".to_vec())));
    assert_eq!(pad.latest_str().ad, TestAd(b"ad v2".to_vec()));
    assert!(pad.latest_str().verify(&pad.signing_public_key()));

    // A null ad reuses the previous one.
    pad.update(None);
    assert_eq!(pad.latest_str().ad, TestAd(b"ad v2".to_vec()));
}

#[test]
fn test_ad_participates_in_the_signature() {
    let mut pad = test_pad(10);
    pad.update(None);
    let root = pad.latest_str().clone();
    assert!(root.verify(&pad.signing_public_key()));

    let mut forged = root;
    forged.ad = TestAd(b"something else".to_vec());
    assert!(!forged.verify(&pad.signing_public_key()));
}

#[test]
fn test_index_is_deterministic_and_provable() {
    let pad = test_pad(10);
    let alice = Name::from("alice");

    let index = pad.index(&alice);
    let (proved_index, proof) = pad.index_proof(&alice);
    assert_eq!(index, proved_index);
    assert!(pad.vrf_public_key().verify(&alice, &index, &proof));
    assert_ne!(index, pad.index(&Name::from("bob")));
}

#[test]
fn test_sign_promise_format() {
    let pad = test_pad(10);
    let index = pad.index(&Name::from("alice"));
    let value = Value::from("k1");
    let previous_signature = pad.latest_str().signature.clone();

    let signature = pad.sign(&previous_signature, &index, &value);
    let message = [&previous_signature[..], &index[..], &value[..]].concat();
    assert!(pad.signing_public_key().verify(&message, &signature));
}

#[test]
fn test_snapshots_are_isolated_from_pending_writes() {
    let mut pad = test_pad(10);
    pad.set(&Name::from("alice"), Value::from("k1"));
    pad.update(None);
    let epoch1_hash = pad.get_str(1).unwrap().tree_hash;

    // Stage more writes; the frozen snapshot must not move.
    pad.set(&Name::from("bob"), Value::from("k2"));
    let path = pad.lookup_in_epoch(&Name::from("alice"), 1).unwrap();
    assert!(path.verify(&epoch1_hash));
    assert_eq!(
        pad.lookup_in_epoch(&Name::from("bob"), 1).unwrap().proof_type(),
        ProofType::Absence
    );
}
