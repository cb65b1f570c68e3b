// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! The Merkle prefix tree.
//!
//! A binary trie over 256-bit indices: at depth `d`, bit `d` of the index
//! selects the left (0) or right (1) child. Leaves sit at the depth where
//! their index first diverges from every other leaf, and unoccupied slots
//! are empty nodes whose hash covers the path prefix leading to them, so
//! every position in the tree is committed.
//!
//! All node hashes are salted with a per-tree random nonce and domain
//! separated: `'L'` for user leaves, `'E'` for empty slots. Interior hashes
//! are cached per side and invalidated along the write path, so recomputing
//! the root after a batch of writes costs only the touched paths.

use crate::hash::{Commitment, Digest};
use crate::types::{Direction, Index, Name, Value};
use crate::utils;
use crate::MAX_DEPTH;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

pub(crate) mod node;
mod proof;

pub use node::{EMPTY_IDENTIFIER, LEAF_IDENTIFIER};
pub use proof::{AuthenticationPath, ProofLeaf, ProofType};

use node::{InteriorNode, TreeNode, UserLeafNode};


/// The Merkle prefix tree: a root interior node, a tree-lifetime random
/// nonce mixed into every node hash, and the cached root hash.
///
/// The root is always an interior node; the empty tree consists of the root
/// and two empty children carrying the one-bit prefixes `0` and `1`.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    nonce: [u8; 32],
    root: InteriorNode,
    hash: Option<Digest>,
}

impl MerkleTree {
    /// Creates an empty tree with a nonce drawn from the process CSPRNG.
    pub fn new() -> Self {
        Self::with_rng(&mut OsRng)
    }

    /// Creates an empty tree with a nonce drawn from the caller's RNG.
    pub fn with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        MerkleTree {
            nonce: crate::hash::rand_slice_with(rng),
            root: InteriorNode::new(0, [0u8; 32]),
            hash: None,
        }
    }

    /// The tree's nonce.
    pub fn nonce(&self) -> &[u8; 32] {
        &self.nonce
    }

    /// The cached root hash, or `None` if the tree has been written to since
    /// the last [MerkleTree::recompute_hash].
    pub fn hash(&self) -> Option<Digest> {
        self.hash
    }

    /// Recomputes the root hash, filling every dirty hash cache on the way,
    /// and stores it. Cheap when called repeatedly: only paths touched by
    /// writes since the last call are rehashed.
    pub fn recompute_hash(&mut self) -> Digest {
        let hash = self.root.compute_hash(&self.nonce);
        self.hash = Some(hash);
        hash
    }

    /// Inserts or updates the binding at `index`.
    ///
    /// A new leaf is placed at the depth where its index diverges from the
    /// existing leaves, splitting one level at a time; an existing leaf with
    /// the same index is rebound in place. Hash caches along the write path
    /// are invalidated.
    ///
    /// Panics if the insertion would descend past [MAX_DEPTH], which means
    /// two distinct names mapped to the same 256-bit index.
    pub fn set(&mut self, index: Index, name: Name, value: Value, commitment: Commitment) {
        self.hash = None;
        let leaf = UserLeafNode {
            level: 0, // assigned at the insertion point
            index,
            name,
            value,
            commitment,
        };
        insert_leaf(&mut self.root, leaf);
    }

    /// Walks the tree towards `lookup_index` and returns the authentication
    /// path: the sibling hash at each step plus a descriptor of the terminal
    /// node, which proves either inclusion or absence of the index.
    ///
    /// On a frozen tree every sibling hash is served from cache; on a tree
    /// with pending writes the dirtied siblings are recomputed on the fly.
    pub fn lookup(&self, lookup_index: &Index) -> AuthenticationPath {
        let mut sibling_hashes = Vec::new();
        let mut current = &self.root;

        loop {
            let direction = Direction::at(lookup_index, current.level);
            sibling_hashes.push(current.child_hash(direction.other(), &self.nonce));

            match current.child(direction) {
                TreeNode::Interior(child) => current = child,
                TreeNode::Leaf(leaf) => {
                    return AuthenticationPath {
                        tree_nonce: self.nonce,
                        lookup_index: *lookup_index,
                        sibling_hashes,
                        leaf: ProofLeaf::from_user_leaf(leaf, lookup_index),
                    };
                }
                TreeNode::Empty(empty) => {
                    return AuthenticationPath {
                        tree_nonce: self.nonce,
                        lookup_index: *lookup_index,
                        sibling_hashes,
                        leaf: ProofLeaf::Empty {
                            level: empty.level,
                            index: empty.index,
                        },
                    };
                }
            }
        }
    }
}

impl Default for MerkleTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Inserts `leaf` into the subtree rooted at `interior`, which sits at the
/// depth equal to its level. Exactly one of four cases applies at each step:
/// the target slot is empty, the target slot is a deeper interior node, the
/// target slot holds a leaf with the same index (rebind), or it holds a leaf
/// with a diverging index (split).
fn insert_leaf(interior: &mut InteriorNode, mut leaf: UserLeafNode) {
    let depth = interior.level;
    if depth >= MAX_DEPTH {
        // Two 256-bit indices that agree on every bit are the same index;
        // reaching this point means the VRF produced a collision.
        panic!("merkle tree insertion descended past depth {MAX_DEPTH}");
    }

    let direction = Direction::at(&leaf.index, depth);
    interior.clear_child_hash(direction);

    let slot = interior.child_mut(direction);
    match slot {
        TreeNode::Empty(_) => {
            leaf.level = depth + 1;
            *slot = TreeNode::Leaf(leaf);
        }
        TreeNode::Interior(child) => insert_leaf(child, leaf),
        TreeNode::Leaf(existing) if existing.index == leaf.index => {
            existing.rebind(leaf.name, leaf.value, leaf.commitment);
        }
        TreeNode::Leaf(_) => {
            // Split: push an interior node in between and re-insert the
            // displaced leaf one level down, on the side picked by the next
            // bit of its index.
            let child_level = depth + 1;
            let split = InteriorNode::new(child_level, utils::prefix(&leaf.index, child_level));
            let displaced = std::mem::replace(slot, TreeNode::Interior(split));
            match (slot, displaced) {
                (TreeNode::Interior(child), TreeNode::Leaf(mut displaced)) => {
                    displaced.level = child_level + 1;
                    let displaced_direction = Direction::at(&displaced.index, child_level);
                    *child.child_mut(displaced_direction) = TreeNode::Leaf(displaced);
                    insert_leaf(child, leaf);
                }
                _ => unreachable!("split slot was just replaced with an interior node"),
            }
        }
    }
}

#[cfg(test)]
impl MerkleTree {
    /// Visits every user leaf, left to right. Test-only introspection.
    pub(crate) fn visit_leaves<F: FnMut(&node::UserLeafNode)>(&self, mut callback: F) {
        fn visit<F: FnMut(&node::UserLeafNode)>(node: &TreeNode, callback: &mut F) {
            match node {
                TreeNode::Interior(interior) => {
                    visit(&interior.left, callback);
                    visit(&interior.right, callback);
                }
                TreeNode::Leaf(leaf) => callback(leaf),
                TreeNode::Empty(_) => {}
            }
        }
        visit(&self.root.left, &mut callback);
        visit(&self.root.right, &mut callback);
    }
}
