// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! The directory facade.
//!
//! A [Directory] wraps a [Pad] and exposes the five operations a key server
//! offers: registration, current-epoch lookup, lookup in a past epoch,
//! monitoring over an epoch range, and STR history. Every operation
//! validates its inputs and returns a [Response] tagged with a
//! [RequestStatus], carrying proofs even on "failures" such as
//! [RequestStatus::NameExisted] so callers can hold the directory to its
//! word.
//!
//! Registrations are staged for the next epoch and vouched for in the
//! meantime by [TemporaryBinding]s; [Directory::update] advances the epoch
//! and drops all outstanding TBs, whose bindings are in the tree from then
//! on.

use crate::ecvrf::{VrfPrivateKey, VrfPublicKey};
use crate::errors::PadError;
use crate::pad::{Pad, SignedTreeRoot};
use crate::sign;
use crate::tree::ProofType;
use crate::types::{Name, Value};

use log::{debug, info};
use std::collections::HashMap;

mod binding;
mod config;
mod response;

pub use binding::TemporaryBinding;
pub use config::{Config, PROTOCOL_VERSION};
pub use response::{
    KeyLookupInEpochProof, KeyLookupProof, MonitoringProof, RegistrationProof, RequestStatus,
    Response, STRHistory,
};


/// An authenticated key directory: a [Pad] plus the temporary bindings
/// issued during the current epoch.
pub struct Directory {
    pad: Pad<Config>,
    tbs: HashMap<Name, TemporaryBinding>,
    config: Config,
}

impl Directory {
    /// Creates a directory with an empty genesis snapshot.
    ///
    /// `signing_key` signs tree roots and temporary bindings; `vrf_key`
    /// derives private indices; `capacity` is the number of snapshots kept
    /// in memory.
    pub fn new(
        vrf_key: VrfPrivateKey,
        signing_key: sign::PrivateKey,
        capacity: usize,
    ) -> Result<Self, PadError> {
        let config = Config::new(vrf_key.public());
        let pad = Pad::new(config.clone(), signing_key, vrf_key, capacity)?;
        Ok(Directory {
            pad,
            tbs: HashMap::new(),
            config,
        })
    }

    /// Advances the directory to the next epoch and drops all issued
    /// temporary bindings, whose mappings are now included in the snapshot.
    pub fn update(&mut self) {
        self.pad.update(Some(self.config.clone()));
        let dropped = self.tbs.len();
        self.tbs.clear();
        info!(
            "advanced to epoch {}, dropped {dropped} temporary bindings",
            self.pad.latest_epoch()
        );
    }

    /// Replaces the advertised update interval. The change is signed into
    /// the next STR and every one after it.
    pub fn set_policies(&mut self, update_interval: u64) {
        self.config.update_interval = Some(update_interval);
    }

    /// The latest signed tree root.
    pub fn latest_str(&self) -> &SignedTreeRoot<Config> {
        self.pad.latest_str()
    }

    /// The public key under which STRs and temporary bindings verify.
    pub fn signing_public_key(&self) -> sign::PublicKey {
        self.pad.signing_public_key()
    }

    /// The VRF public key clients use to verify private indices.
    pub fn vrf_public_key(&self) -> VrfPublicKey {
        self.pad.vrf_public_key()
    }

    /// Registers a new name-to-value mapping.
    ///
    /// The mapping is staged for inclusion in the next snapshot and a signed
    /// [TemporaryBinding] is issued as a promise of that inclusion; the
    /// response carries a proof of the name's current absence, the TB, and
    /// the latest STR.
    ///
    /// Registering a name that is already bound, or already pending in this
    /// epoch, changes nothing and returns [RequestStatus::NameExisted] with
    /// the proof (and, for a pending name, the previously issued TB). An
    /// empty name or value is malformed.
    pub fn register(&mut self, name: &Name, value: &Value) -> Response<RegistrationProof> {
        if name.is_empty() || value.is_empty() {
            return Response::error(RequestStatus::MalformedMessage);
        }

        let auth_path = self.pad.lookup(name);
        let root = self.latest_str().clone();

        if auth_path.proof_type() == ProofType::Inclusion {
            return Response::new(
                RequestStatus::NameExisted,
                RegistrationProof {
                    auth_path,
                    tb: None,
                    root,
                },
            );
        }

        // The name may have been registered within this epoch, in which case
        // it is absent from the snapshot but has an outstanding promise.
        if let Some(tb) = self.tbs.get(name) {
            return Response::new(
                RequestStatus::NameExisted,
                RegistrationProof {
                    auth_path,
                    tb: Some(tb.clone()),
                    root,
                },
            );
        }

        let tb = self.issue_binding(name, value);
        self.pad.set(name, value.clone());
        self.tbs.insert(name.clone(), tb.clone());
        debug!(
            "registered a binding for epoch {}, {} now pending",
            self.pad.latest_epoch() + 1,
            self.tbs.len()
        );

        Response::new(
            RequestStatus::Success,
            RegistrationProof {
                auth_path,
                tb: Some(tb),
                root,
            },
        )
    }

    /// Looks a name up in the latest snapshot.
    ///
    /// Returns an inclusion proof for a bound name; an absence proof plus
    /// the pending [TemporaryBinding] for a name registered during the
    /// current epoch; and an absence proof tagged
    /// [RequestStatus::NameNotFound] otherwise. The latest STR accompanies
    /// all three.
    pub fn key_lookup(&self, name: &Name) -> Response<KeyLookupProof> {
        if name.is_empty() {
            return Response::error(RequestStatus::MalformedMessage);
        }

        let auth_path = self.pad.lookup(name);
        let root = self.latest_str().clone();

        if auth_path.proof_type() == ProofType::Inclusion {
            return Response::new(
                RequestStatus::Success,
                KeyLookupProof {
                    auth_path,
                    root,
                    tb: None,
                },
            );
        }

        if let Some(tb) = self.tbs.get(name) {
            return Response::new(
                RequestStatus::Success,
                KeyLookupProof {
                    auth_path,
                    root,
                    tb: Some(tb.clone()),
                },
            );
        }

        Response::new(
            RequestStatus::NameNotFound,
            KeyLookupProof {
                auth_path,
                root,
                tb: None,
            },
        )
    }

    /// Looks a name up in the snapshot of a past epoch, returning the proof
    /// together with the STRs for every epoch from `epoch` through the
    /// latest.
    ///
    /// An empty name, a future epoch, or an epoch already evicted from the
    /// snapshot window is malformed. The response never carries a temporary
    /// binding: TBs are dropped when their epoch's snapshot is taken.
    pub fn key_lookup_in_epoch(
        &self,
        name: &Name,
        epoch: u64,
    ) -> Response<KeyLookupInEpochProof> {
        if name.is_empty() || epoch > self.pad.latest_epoch() {
            return Response::error(RequestStatus::MalformedMessage);
        }

        let auth_path = match self.pad.lookup_in_epoch(name, epoch) {
            Ok(path) => path,
            // The only lookup failure is an epoch outside the retained
            // window, which is the requester's problem.
            Err(_) => return Response::error(RequestStatus::MalformedMessage),
        };

        let status = match auth_path.proof_type() {
            ProofType::Inclusion => RequestStatus::Success,
            ProofType::Absence => RequestStatus::NameNotFound,
        };
        Response::new(
            status,
            KeyLookupInEpochProof {
                auth_path,
                roots: self.str_range(epoch, self.pad.latest_epoch()),
            },
        )
    }

    /// Returns proofs and STRs for a name over the epoch range
    /// `[start_epoch, end_epoch]`, for clients monitoring their own binding.
    ///
    /// The end of the range is clamped to the latest epoch. An empty name,
    /// an inverted range, or a start epoch outside the retained window is
    /// malformed.
    pub fn monitor(
        &self,
        name: &Name,
        start_epoch: u64,
        end_epoch: u64,
    ) -> Response<MonitoringProof> {
        if name.is_empty() || start_epoch > self.pad.latest_epoch() || start_epoch > end_epoch {
            return Response::error(RequestStatus::MalformedMessage);
        }

        let end_epoch = end_epoch.min(self.pad.latest_epoch());
        let mut auth_paths = Vec::with_capacity((end_epoch - start_epoch + 1) as usize);
        for epoch in start_epoch..=end_epoch {
            match self.pad.lookup_in_epoch(name, epoch) {
                Ok(path) => auth_paths.push(path),
                // An evicted epoch inside the range is the requester's
                // problem, same as a start epoch past the latest.
                Err(_) => return Response::error(RequestStatus::MalformedMessage),
            }
        }

        Response::new(
            RequestStatus::Success,
            MonitoringProof {
                auth_paths,
                roots: self.str_range(start_epoch, end_epoch),
            },
        )
    }

    /// Returns the STRs for the epoch range `[start_epoch, end_epoch]`, for
    /// auditors tracking the hash chain.
    ///
    /// The end of the range is clamped to the latest epoch. An inverted
    /// range or a start epoch outside the retained window is malformed.
    pub fn str_history(&self, start_epoch: u64, end_epoch: u64) -> Response<STRHistory> {
        if start_epoch > self.pad.latest_epoch() || end_epoch < start_epoch {
            return Response::error(RequestStatus::MalformedMessage);
        }
        if start_epoch < self.pad.oldest_epoch() {
            return Response::error(RequestStatus::MalformedMessage);
        }

        let end_epoch = end_epoch.min(self.pad.latest_epoch());
        Response::new(
            RequestStatus::Success,
            STRHistory {
                roots: self.str_range(start_epoch, end_epoch),
            },
        )
    }

    /// Issues the signed promise for a new mapping: the VRF index, the
    /// value, and a signature binding both to the latest STR.
    fn issue_binding(&self, name: &Name, value: &Value) -> TemporaryBinding {
        let index = self.pad.index(name);
        let signature = self.pad.sign(&self.latest_str().signature, &index, value);
        TemporaryBinding {
            index,
            value: value.clone(),
            signature,
        }
    }

    /// The STRs for a retained epoch range, oldest first.
    fn str_range(&self, start_epoch: u64, end_epoch: u64) -> Vec<SignedTreeRoot<Config>> {
        (start_epoch..=end_epoch)
            .map(|epoch| {
                self.pad
                    .get_str(epoch)
                    .expect("the whole range is inside the retained window")
                    .clone()
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn pending_binding_count(&self) -> usize {
        self.tbs.len()
    }
}
