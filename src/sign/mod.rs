// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Ed25519 signatures over opaque byte strings.
//!
//! The signer performs no message encoding of its own: callers produce the
//! exact byte string that is signed and later re-produce it for
//! verification. Verification failures are rendered as `false`, never as
//! errors.

use ed25519_dalek::{Signer, Verifier};
use rand::{CryptoRng, RngCore};

#[cfg(test)]
mod tests;

/// The size of a public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// The size of a signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 signing key.
#[derive(Clone)]
pub struct PrivateKey(ed25519_dalek::SigningKey);

/// An Ed25519 verification key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(ed25519_dalek::VerifyingKey);

impl PrivateKey {
    /// Generates a fresh random signing key from the caller's CSPRNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(ed25519_dalek::SigningKey::generate(rng))
    }

    /// Reconstructs a signing key from its 32-byte seed.
    pub fn from_bytes(seed: &[u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(seed))
    }

    /// The 32-byte seed of this signing key.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Signs `message`, returning the [SIGNATURE_LENGTH]-byte signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.0.sign(message).to_bytes().to_vec()
    }

    /// The corresponding public key.
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }
}

impl PublicKey {
    /// Verifies `signature` over `message`. Returns `true` if and only if the
    /// signature is valid under this key; malformed signatures are simply
    /// invalid.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match ed25519_dalek::Signature::from_slice(signature) {
            Ok(signature) => self.0.verify(message, &signature).is_ok(),
            Err(_) => false,
        }
    }

    /// The key's byte encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }
}

impl core::convert::TryFrom<&[u8]> for PublicKey {
    type Error = String;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| format!("expected a {PUBLIC_KEY_LENGTH} byte public key"))?;
        ed25519_dalek::VerifyingKey::from_bytes(&arr)
            .map(Self)
            .map_err(|e| format!("invalid public key: {e}"))
    }
}
