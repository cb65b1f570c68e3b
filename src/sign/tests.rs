// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Tests for the signature wrapper

use super::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_sign_and_verify() {
    let mut rng = StdRng::seed_from_u64(1);
    let key = PrivateKey::generate(&mut rng);
    let message = b"sign me";
    let signature = key.sign(message);

    assert_eq!(signature.len(), SIGNATURE_LENGTH);
    assert!(key.public().verify(message, &signature));
    assert!(!key.public().verify(b"different message", &signature));
}

#[test]
fn test_verify_rejects_tampered_signature() {
    let mut rng = StdRng::seed_from_u64(2);
    let key = PrivateKey::generate(&mut rng);
    let message = b"sign me";
    let signature = key.sign(message);

    for byte in 0..signature.len() {
        let mut bad = signature.clone();
        bad[byte] ^= 0x01;
        assert!(!key.public().verify(message, &bad), "byte {byte}");
    }

    // Garbage of the wrong length is invalid, not an error.
    assert!(!key.public().verify(message, &signature[..40]));
    assert!(!key.public().verify(message, &[]));
}

#[test]
fn test_verify_rejects_wrong_key() {
    let mut rng = StdRng::seed_from_u64(3);
    let key = PrivateKey::generate(&mut rng);
    let other = PrivateKey::generate(&mut rng);
    let signature = key.sign(b"sign me");
    assert!(!other.public().verify(b"sign me", &signature));
}

#[test]
fn test_keys_are_reconstructible_from_seed() {
    let seed = *b"deterministic tests need 256 bit";
    let a = PrivateKey::from_bytes(&seed);
    let b = PrivateKey::from_bytes(&seed);
    assert_eq!(a.public(), b.public());
    assert_eq!(a.to_bytes(), seed);

    let roundtrip = PublicKey::try_from(&a.public().to_bytes()[..]).unwrap();
    assert_eq!(roundtrip, a.public());
    assert!(PublicKey::try_from(&[0u8; 16][..]).is_err());
}
