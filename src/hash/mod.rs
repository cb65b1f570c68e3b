// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! The hash facade: BLAKE3 digests, the process CSPRNG, and salted
//! commitments.
//!
//! # Fixed-width fields, no length prefix
//!
//! [digest] hashes the plain concatenation of its inputs without length
//! prefixes. Unambiguity therefore relies on every caller passing fixed-width
//! fields in a fixed order, with a domain-separation byte up front where two
//! encodings could otherwise collide (see the tree's node hashing rules). Any
//! new hashed field must either be fixed-width or carry an explicit length
//! prefix.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

#[cfg(test)]
mod tests;

/// The number of bytes in a digest
pub const DIGEST_BYTES: usize = 32;

/// A hash digest of [DIGEST_BYTES] bytes
pub type Digest = [u8; DIGEST_BYTES];

/// Identifies the hash algorithm in use; hashed into every signed tree root
/// through the directory configuration.
pub const HASH_ID: &str = "BLAKE3";

/// The BLAKE3 key-derivation context for commitment hashes.
///
/// This string is part of the protocol: changing it invalidates every
/// commitment ever issued, so it must never change without a protocol
/// version bump.
pub const COMMITMENT_CONTEXT: &str = "clonics commit v1";

/// Hashes the concatenation of all passed byte slices into a single digest.
pub fn digest(parts: &[&[u8]]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Returns 32 random bytes from the process CSPRNG.
pub fn rand_slice() -> [u8; 32] {
    rand_slice_with(&mut OsRng)
}

/// Returns 32 random bytes from the caller's RNG. Tests inject a seeded
/// generator here to get deterministic salts and nonces.
pub fn rand_slice_with<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    bytes
}

fn commitment_hash(salt: &[u8; 32], values: &[&[u8]]) -> Digest {
    let key = blake3::derive_key(COMMITMENT_CONTEXT, salt);
    let mut hasher = blake3::Hasher::new_keyed(&key);
    for value in values {
        hasher.update(value);
    }
    hasher.finalize().into()
}

/// A cryptographic commitment to a list of values: a salt and the keyed hash
/// of the values under a key derived from that salt.
///
/// The salt makes the commitment hiding; revealing it opens the commitment.
/// Proofs of absence carry a [redacted](Commitment::redacted) copy whose salt
/// has been dropped, which commits to the same hash but can no longer be
/// opened.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Commitment {
    /// The salt the committed values were hashed with, if it has not been
    /// redacted.
    pub salt: Option<[u8; 32]>,
    /// The keyed hash of the committed values.
    pub hash: Digest,
}

impl Commitment {
    /// Commits to `values` under a fresh random salt from the process CSPRNG.
    pub fn new(values: &[&[u8]]) -> Self {
        Self::with_rng(&mut OsRng, values)
    }

    /// Commits to `values` under a fresh random salt from the caller's RNG.
    pub fn with_rng<R: RngCore + CryptoRng>(rng: &mut R, values: &[&[u8]]) -> Self {
        Self::with_salt(rand_slice_with(rng), values)
    }

    /// Commits to `values` under a salt derived from a secret key and the
    /// values themselves.
    ///
    /// Committing to the same values under the same key reproduces the same
    /// commitment bit for bit, so re-setting an unchanged binding leaves the
    /// tree hash untouched. The key must stay secret or the commitment stops
    /// hiding.
    pub fn derive(key: &[u8; 32], values: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new_keyed(key);
        for value in values {
            hasher.update(value);
        }
        Self::with_salt(hasher.finalize().into(), values)
    }

    /// Commits to `values` under the given salt.
    pub fn with_salt(salt: [u8; 32], values: &[&[u8]]) -> Self {
        Self {
            hash: commitment_hash(&salt, values),
            salt: Some(salt),
        }
    }

    /// Verifies that this commitment opens to `values`. Returns `false` for a
    /// redacted commitment.
    pub fn verify(&self, values: &[&[u8]]) -> bool {
        match &self.salt {
            Some(salt) => self.hash == commitment_hash(salt, values),
            None => false,
        }
    }

    /// A copy of this commitment with the salt dropped, for use in proofs of
    /// absence where the terminal leaf belongs to someone else.
    pub fn redacted(&self) -> Self {
        Self {
            salt: None,
            hash: self.hash,
        }
    }
}
