// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Authentication paths: proofs of inclusion and absence, and their
//! verification against a published tree hash.

use crate::hash::{self, Commitment, Digest};
use crate::tree::node::{UserLeafNode, EMPTY_IDENTIFIER, LEAF_IDENTIFIER};
use crate::types::{Index, Value};
use crate::utils;

/// What an [AuthenticationPath] proves about its lookup index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ProofType {
    /// The index is bound in the tree: the terminal leaf carries it.
    Inclusion,
    /// The index is not bound: the walk ended at an empty slot or at a leaf
    /// with a diverging index.
    Absence,
}

/// The terminal node of an authentication path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ProofLeaf {
    /// A user leaf. For an inclusion proof its index equals the lookup index
    /// and the value and commitment salt are populated; for a proof of
    /// absence it is a *different* leaf sharing the lookup index's prefix,
    /// with the value and salt redacted.
    User {
        /// The leaf's depth from the root.
        level: u32,
        /// The leaf's full 256-bit index.
        index: Index,
        /// The bound value; present only on inclusion proofs.
        value: Option<Value>,
        /// The leaf's commitment; the salt is redacted on absence proofs.
        commitment: Commitment,
    },
    /// An empty slot whose prefix covers the lookup index.
    Empty {
        /// The slot's depth from the root.
        level: u32,
        /// The slot's path prefix, zero-padded to the full index width.
        index: Index,
    },
}

impl ProofLeaf {
    /// Builds the proof descriptor for a terminal user leaf, redacting the
    /// value and commitment salt unless the leaf is the one looked up.
    pub(crate) fn from_user_leaf(leaf: &UserLeafNode, lookup_index: &Index) -> Self {
        if leaf.index == *lookup_index {
            ProofLeaf::User {
                level: leaf.level,
                index: leaf.index,
                value: Some(leaf.value.clone()),
                commitment: leaf.commitment.clone(),
            }
        } else {
            ProofLeaf::User {
                level: leaf.level,
                index: leaf.index,
                value: None,
                commitment: leaf.commitment.redacted(),
            }
        }
    }

    /// The terminal node's depth from the root.
    pub fn level(&self) -> u32 {
        match self {
            ProofLeaf::User { level, .. } | ProofLeaf::Empty { level, .. } => *level,
        }
    }

    /// The terminal node's index: a full index for a user leaf, a padded
    /// path prefix for an empty slot.
    pub fn index(&self) -> &Index {
        match self {
            ProofLeaf::User { index, .. } | ProofLeaf::Empty { index, .. } => index,
        }
    }

    /// The terminal node's hash under the tree's hashing rules.
    pub fn hash(&self, tree_nonce: &[u8; 32]) -> Digest {
        match self {
            ProofLeaf::User {
                level,
                index,
                commitment,
                ..
            } => hash::digest(&[
                &[LEAF_IDENTIFIER],
                tree_nonce,
                index,
                &level.to_le_bytes(),
                &commitment.hash,
            ]),
            ProofLeaf::Empty { level, index } => hash::digest(&[
                &[EMPTY_IDENTIFIER],
                tree_nonce,
                index,
                &level.to_le_bytes(),
            ]),
        }
    }
}

/// A proof of inclusion or absence for one lookup index: the tree nonce, the
/// sibling hash at each level of the walk (root to leaf), and the terminal
/// leaf descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AuthenticationPath {
    /// The nonce of the tree the proof was extracted from.
    pub tree_nonce: [u8; 32],
    /// The index that was looked up.
    pub lookup_index: Index,
    /// Sibling hashes in root-to-leaf order, one per level above the
    /// terminal node.
    pub sibling_hashes: Vec<Digest>,
    /// The terminal node.
    pub leaf: ProofLeaf,
}

impl AuthenticationPath {
    /// Whether this path proves inclusion or absence of its lookup index.
    pub fn proof_type(&self) -> ProofType {
        match &self.leaf {
            ProofLeaf::User { index, .. } if *index == self.lookup_index => ProofType::Inclusion,
            _ => ProofType::Absence,
        }
    }

    /// Recomputes the root hash this path commits to: the terminal leaf's
    /// hash folded with each sibling, leaf to root, with bit `k` of the
    /// lookup index placing the sibling on the left (bit 1) or right (bit 0)
    /// at level `k`.
    pub fn root_hash(&self) -> Digest {
        let mut current = self.leaf.hash(&self.tree_nonce);
        let levels = (self.leaf.level() as usize).min(self.sibling_hashes.len());
        for level in (0..levels).rev() {
            let sibling = &self.sibling_hashes[level];
            current = if utils::bit_at(&self.lookup_index, level as u32) {
                hash::digest(&[sibling, &current])
            } else {
                hash::digest(&[&current, sibling])
            };
        }
        current
    }

    /// Verifies this path against a published tree hash: the path must be
    /// structurally sound for its lookup index and reconstruct exactly
    /// `tree_hash`.
    ///
    /// Structural soundness means one sibling per level, a terminal node at
    /// depth at least one, and an index relation matching the proof type:
    /// equality for inclusion, a shared prefix (with a populated value on
    /// neither side) for the two absence shapes.
    pub fn verify(&self, tree_hash: &Digest) -> bool {
        let level = self.leaf.level();
        if level == 0 || level > crate::MAX_DEPTH || self.sibling_hashes.len() != level as usize {
            return false;
        }

        let consistent = match &self.leaf {
            ProofLeaf::User {
                index,
                value,
                commitment,
                ..
            } => {
                if *index == self.lookup_index {
                    // Inclusion: the opening must be present.
                    value.is_some() && commitment.salt.is_some()
                } else {
                    // Absence via a diverging leaf: it must live on the
                    // lookup path, and must stay redacted.
                    utils::prefix(index, level) == utils::prefix(&self.lookup_index, level)
                        && value.is_none()
                        && commitment.salt.is_none()
                }
            }
            ProofLeaf::Empty { index, .. } => {
                // Absence via an empty slot on the lookup path.
                utils::prefix(&self.lookup_index, level) == *index
            }
        };

        consistent && self.root_hash() == *tree_hash
    }

    /// For an inclusion proof, checks that the leaf's commitment opens to
    /// `(name, value)` and that the proof carries exactly `value`. Always
    /// `false` for absence proofs, whose commitments are redacted.
    pub fn verify_binding(&self, name: &[u8], value: &[u8]) -> bool {
        match &self.leaf {
            ProofLeaf::User {
                value: Some(bound_value),
                commitment,
                ..
            } => bound_value.0 == value && commitment.verify(&[name, value]),
            _ => false,
        }
    }
}
