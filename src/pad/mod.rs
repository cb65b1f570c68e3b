// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! The persistent authenticated dictionary engine.
//!
//! A [Pad] owns the pending Merkle tree that accumulates writes for the next
//! epoch, a bounded ring of frozen snapshots (one per retained epoch, each
//! paired with its [SignedTreeRoot]), and the keys: the Ed25519 signing key
//! that authenticates roots and temporary bindings, and the VRF key that
//! turns names into private indices.
//!
//! Reads are always served from snapshots, so a proof obtained in epoch `e`
//! verifies against the STR of epoch `e` even while writes for `e + 1` are
//! being staged.

use crate::ecvrf::{VrfPrivateKey, VrfProof, VrfPublicKey};
use crate::errors::PadError;
use crate::hash::{self, Commitment};
use crate::sign;
use crate::tree::{AuthenticationPath, MerkleTree};
use crate::types::{Index, Name, Value};

use log::debug;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::collections::BTreeMap;

mod root;
pub use root::{AssocData, SignedTreeRoot};

#[cfg(test)]
mod tests;

/// One retained epoch: the signed tree root and the frozen tree it commits
/// to. Snapshots are immutable once inserted.
struct Snapshot<A: AssocData> {
    root: SignedTreeRoot<A>,
    tree: MerkleTree,
}

/// The PAD engine: an ordered map from epoch to snapshot, restricted to the
/// most recent `capacity` epochs, plus the pending tree for the next epoch.
pub struct Pad<A: AssocData + Clone> {
    signing_key: sign::PrivateKey,
    vrf_key: VrfPrivateKey,
    /// Secret key for deriving leaf commitment salts; never leaves the
    /// server. Deriving salts (rather than drawing them fresh) makes
    /// re-setting an unchanged binding a no-op on the tree hash.
    commitment_key: [u8; 32],
    ad: A,
    capacity: usize,
    latest_epoch: u64,
    /// Writes staged since the last update; becomes the next snapshot.
    tree: MerkleTree,
    snapshots: BTreeMap<u64, Snapshot<A>>,
}

impl<A: AssocData + Clone> Pad<A> {
    /// Creates a PAD holding a single empty snapshot at epoch 0, with its
    /// genesis STR signed over `ad`.
    ///
    /// `capacity` bounds the number of retained snapshots and must be at
    /// least 1.
    pub fn new(
        ad: A,
        signing_key: sign::PrivateKey,
        vrf_key: VrfPrivateKey,
        capacity: usize,
    ) -> Result<Self, PadError> {
        Self::with_rng(&mut OsRng, ad, signing_key, vrf_key, capacity)
    }

    /// Like [Pad::new], with the tree nonce drawn from the caller's RNG.
    pub fn with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        ad: A,
        signing_key: sign::PrivateKey,
        vrf_key: VrfPrivateKey,
        capacity: usize,
    ) -> Result<Self, PadError> {
        if capacity == 0 {
            return Err(PadError::InvalidCapacity);
        }

        let commitment_key = hash::digest(&[&vrf_key.to_bytes()]);
        let mut tree = MerkleTree::with_rng(rng);
        let tree_hash = tree.recompute_hash();
        let genesis = SignedTreeRoot::new(&signing_key, ad.clone(), tree_hash, 0, None);

        let mut snapshots = BTreeMap::new();
        snapshots.insert(
            0,
            Snapshot {
                root: genesis,
                tree: tree.clone(),
            },
        );

        Ok(Pad {
            signing_key,
            vrf_key,
            commitment_key,
            ad,
            capacity,
            latest_epoch: 0,
            tree,
            snapshots,
        })
    }

    /// The private index of `name`.
    pub fn index(&self, name: &Name) -> Index {
        self.vrf_key.evaluate(name)
    }

    /// The private index of `name` together with the VRF proof a client
    /// needs to check it.
    pub fn index_proof(&self, name: &Name) -> (Index, VrfProof) {
        self.vrf_key.prove(name)
    }

    /// The VRF public key under which indices verify.
    pub fn vrf_public_key(&self) -> VrfPublicKey {
        self.vrf_key.public()
    }

    /// The public key under which STRs and temporary bindings verify.
    pub fn signing_public_key(&self) -> sign::PublicKey {
        self.signing_key.public()
    }

    /// Stages a binding for the next epoch. The write lands in the pending
    /// tree only; it becomes visible to lookups after the next
    /// [Pad::update].
    pub fn set(&mut self, name: &Name, value: Value) {
        let index = self.index(name);
        let commitment = Commitment::derive(&self.commitment_key, &[name.as_slice(), value.as_slice()]);
        self.tree.set(index, name.clone(), value, commitment);
    }

    /// Looks `name` up in the latest snapshot.
    pub fn lookup(&self, name: &Name) -> AuthenticationPath {
        self.lookup_in_epoch(name, self.latest_epoch)
            .expect("the latest epoch is always retained")
    }

    /// Looks `name` up in the snapshot for `epoch`. Fails if the epoch lies
    /// outside the retained window.
    pub fn lookup_in_epoch(&self, name: &Name, epoch: u64) -> Result<AuthenticationPath, PadError> {
        let snapshot = self.snapshot(epoch)?;
        Ok(snapshot.tree.lookup(&self.index(name)))
    }

    /// The signed tree root for `epoch`, if it is still retained.
    pub fn get_str(&self, epoch: u64) -> Option<&SignedTreeRoot<A>> {
        self.snapshots.get(&epoch).map(|snapshot| &snapshot.root)
    }

    /// The signed tree root of the latest epoch.
    pub fn latest_str(&self) -> &SignedTreeRoot<A> {
        self.get_str(self.latest_epoch)
            .expect("the latest epoch is always retained")
    }

    /// The latest epoch number.
    pub fn latest_epoch(&self) -> u64 {
        self.latest_epoch
    }

    /// The oldest retained epoch number.
    pub fn oldest_epoch(&self) -> u64 {
        self.snapshots
            .keys()
            .next()
            .copied()
            .expect("the snapshot ring is never empty")
    }

    /// Signs `previous_signature || index || value`, the promise format used
    /// for temporary bindings.
    pub fn sign(&self, previous_signature: &[u8], index: &Index, value: &Value) -> Vec<u8> {
        let message = [previous_signature, index.as_slice(), value.as_slice()].concat();
        self.signing_key.sign(&message)
    }

    /// Advances the epoch: freezes the pending tree into the snapshot ring
    /// under a new STR chained to the previous one, evicts the oldest
    /// snapshot beyond the capacity, and re-clones the frozen tree as the
    /// next pending tree.
    ///
    /// When `ad` is given it replaces the stored associated data and is
    /// signed into the new STR; otherwise the previous associated data is
    /// reused.
    pub fn update(&mut self, ad: Option<A>) {
        if let Some(ad) = ad {
            self.ad = ad;
        }

        let tree_hash = self.tree.recompute_hash();
        let previous_hash = hash::digest(&[&self.latest_str().signature]);
        let epoch = self.latest_epoch + 1;
        let root = SignedTreeRoot::new(
            &self.signing_key,
            self.ad.clone(),
            tree_hash,
            epoch,
            Some(previous_hash),
        );

        let pending = self.tree.clone();
        let frozen = std::mem::replace(&mut self.tree, pending);
        self.snapshots.insert(epoch, Snapshot { root, tree: frozen });
        self.latest_epoch = epoch;

        while self.snapshots.len() > self.capacity {
            let evicted = self.snapshots.pop_first();
            debug!(
                "evicted snapshot for epoch {:?}",
                evicted.map(|(epoch, _)| epoch)
            );
        }
        debug!(
            "advanced to epoch {} with root {}, retaining epochs {}..={}",
            epoch,
            hex::encode(tree_hash),
            self.oldest_epoch(),
            self.latest_epoch
        );
    }

    fn snapshot(&self, epoch: u64) -> Result<&Snapshot<A>, PadError> {
        self.snapshots
            .get(&epoch)
            .ok_or_else(|| PadError::EpochOutOfWindow {
                epoch,
                oldest: self.oldest_epoch(),
                latest: self.latest_epoch,
            })
    }
}
