// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Signed tree roots and the hash chain between them.

use crate::hash::{self, Digest, DIGEST_BYTES};
use crate::sign;

/// Associated data hashed into every signed tree root.
///
/// The surrounding system decides what a root commits to beyond the tree
/// (protocol version, algorithm identifiers, policies) and contributes it
/// here as opaque bytes. The encoding must be fixed-width field by field (or
/// explicitly length-prefixed), because it is concatenated into the signed
/// byte string without framing.
pub trait AssocData {
    /// The serialized associated data.
    fn bytes(&self) -> Vec<u8>;
}

/// A signed tree root (STR), generated at the beginning of every epoch.
///
/// An STR binds the root hash of that epoch's tree snapshot to the epoch
/// number and to the hash of the *previous* STR's signature, forming a hash
/// chain over the directory's entire history: epoch `e > 0` satisfies
/// `previous_str_hash == digest(signature of STR at e - 1)` and
/// `previous_epoch == e - 1`. The genesis root has `previous_epoch == 0` and
/// no previous hash.
#[derive(Debug, Clone)]
pub struct SignedTreeRoot<A: AssocData> {
    /// The root hash of the tree snapshot this STR commits to.
    pub tree_hash: Digest,
    /// The epoch counter, starting at 0.
    pub epoch: u64,
    /// The epoch of the preceding STR; equal to `epoch - 1` except at
    /// genesis, where it is 0.
    pub previous_epoch: u64,
    /// The digest of the preceding STR's signature; absent at genesis.
    pub previous_str_hash: Option<Digest>,
    /// The signature over [SignedTreeRoot::bytes].
    pub signature: Vec<u8>,
    /// The associated data hashed into the signature.
    pub ad: A,
}

impl<A: AssocData> SignedTreeRoot<A> {
    /// Constructs and signs the STR for `epoch`.
    pub(crate) fn new(
        key: &sign::PrivateKey,
        ad: A,
        tree_hash: Digest,
        epoch: u64,
        previous_str_hash: Option<Digest>,
    ) -> Self {
        let mut root = SignedTreeRoot {
            tree_hash,
            epoch,
            previous_epoch: epoch.saturating_sub(1),
            previous_str_hash,
            signature: Vec::new(),
            ad,
        };
        root.signature = key.sign(&root.bytes());
        root
    }

    /// Serializes the STR fields without the associated data: the epoch, the
    /// previous epoch (omitted at genesis), the tree hash, and the previous
    /// STR hash (absent at genesis). Integers are 8 little-endian bytes.
    pub fn serialize_internal(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + 8 + 2 * DIGEST_BYTES);
        bytes.extend_from_slice(&self.epoch.to_le_bytes());
        if self.epoch > 0 {
            bytes.extend_from_slice(&self.previous_epoch.to_le_bytes());
        }
        bytes.extend_from_slice(&self.tree_hash);
        if let Some(previous) = &self.previous_str_hash {
            bytes.extend_from_slice(previous);
        }
        bytes
    }

    /// The exact byte string that is signed: [SignedTreeRoot::serialize_internal]
    /// followed by the associated data. Use this for signing and for
    /// verification alike.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = self.serialize_internal();
        bytes.extend_from_slice(&self.ad.bytes());
        bytes
    }

    /// Verifies this STR's signature under the directory's public signing
    /// key.
    pub fn verify(&self, public_key: &sign::PublicKey) -> bool {
        public_key.verify(&self.bytes(), &self.signature)
    }

    /// Checks that this STR extends `saved`: consecutive epochs, and this
    /// root's previous-STR hash equal to the digest of `saved`'s signature.
    pub fn verify_hash_chain(&self, saved: &SignedTreeRoot<A>) -> bool {
        let chained = match &self.previous_str_hash {
            Some(previous) => *previous == hash::digest(&[&saved.signature]),
            None => false,
        };
        self.previous_epoch == saved.epoch && self.epoch == saved.epoch + 1 && chained
    }
}
