// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Tests for hashing and commitments

use super::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_digest() {
    let msg = b"test message";
    let d = digest(&[msg]);
    assert_eq!(d.len(), DIGEST_BYTES);
    assert_ne!(d, [0u8; DIGEST_BYTES], "hash is all zeros");
    assert_eq!(digest(&[msg]), d);

    let expected: Digest = ::blake3::hash(msg).into();
    assert_eq!(d, expected);
}

#[test]
fn test_digest_is_plain_concatenation() {
    // No length prefixing: split points must not change the digest. Callers
    // get unambiguity from fixed-width fields, not from the facade.
    let whole = digest(&[b"alice+key"]);
    let split = digest(&[b"alice", b"+", b"key"]);
    assert_eq!(whole, split);
}

#[test]
fn test_rand_slice() {
    let a = rand_slice();
    let b = rand_slice();
    assert_eq!(a.len(), 32);
    assert_ne!(a, b, "two CSPRNG draws collided");
}

#[test]
fn test_rand_slice_with_is_deterministic() {
    let mut rng1 = StdRng::seed_from_u64(42);
    let mut rng2 = StdRng::seed_from_u64(42);
    assert_eq!(rand_slice_with(&mut rng1), rand_slice_with(&mut rng2));
}

#[test]
fn test_commit_roundtrip() {
    let stuff: [&[u8]; 2] = [&[1, 2, 3], &[4, 5, 6]];
    let commit = Commitment::new(&stuff);
    assert!(commit.verify(&stuff), "commit doesn't verify");
    assert!(!commit.verify(&[&[1, 2, 3], &[4, 5, 7]]));
    assert!(!commit.verify(&[&[1, 2, 3]]));
}

#[test]
fn test_commit_binding_bit_flips() {
    let values: [&[u8]; 2] = [b"alice", b"key material"];
    let commit = Commitment::new(&values);
    let salt = commit.salt.unwrap();

    // Flipping any bit of the salt must break verification.
    for byte in 0..salt.len() {
        for bit in 0..8 {
            let mut bad_salt = salt;
            bad_salt[byte] ^= 1 << bit;
            let bad = Commitment {
                salt: Some(bad_salt),
                hash: commit.hash,
            };
            assert!(!bad.verify(&values));
        }
    }

    // Flipping any bit of the hash must break verification.
    for byte in 0..commit.hash.len() {
        for bit in 0..8 {
            let mut bad = commit.clone();
            bad.hash[byte] ^= 1 << bit;
            assert!(!bad.verify(&values));
        }
    }

    // Flipping any bit of the committed values must break verification.
    let mut value = values[1].to_vec();
    for byte in 0..value.len() {
        for bit in 0..8 {
            value[byte] ^= 1 << bit;
            assert!(!commit.verify(&[values[0], &value]));
            value[byte] ^= 1 << bit;
        }
    }
}

#[test]
fn test_derived_commitments_are_reproducible() {
    let key = [7u8; 32];
    let a = Commitment::derive(&key, &[b"alice", b"k1"]);
    let b = Commitment::derive(&key, &[b"alice", b"k1"]);
    assert_eq!(a, b);
    assert!(a.verify(&[b"alice", b"k1"]));

    let other_value = Commitment::derive(&key, &[b"alice", b"k2"]);
    assert_ne!(a.hash, other_value.hash);
    let other_key = Commitment::derive(&[8u8; 32], &[b"alice", b"k1"]);
    assert_ne!(a.hash, other_key.hash);
}

#[test]
fn test_redacted_commitment_does_not_open() {
    let values: [&[u8]; 1] = [b"secret"];
    let commit = Commitment::new(&values);
    let redacted = commit.redacted();
    assert_eq!(redacted.hash, commit.hash);
    assert_eq!(redacted.salt, None);
    assert!(!redacted.verify(&values));
}
