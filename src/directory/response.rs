// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Tagged responses returned by every directory operation.

use crate::directory::{Config, TemporaryBinding};
use crate::pad::SignedTreeRoot;
use crate::tree::AuthenticationPath;

/// The status tag attached to a directory response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum RequestStatus {
    /// The request succeeded; the payload carries the proof.
    Success,
    /// Registration was refused because the name is already bound or already
    /// pending; the payload proves it.
    NameExisted,
    /// The looked-up name is not bound; the payload carries the proof of
    /// absence.
    NameNotFound,
    /// The request was ill-formed: an empty name, an epoch outside the
    /// retained window, or an inverted range. No payload, no state change.
    ///
    /// Internal directory failures have no status of their own: every
    /// operation here is in-memory and infallible once its inputs are
    /// validated, and a violated invariant is fatal rather than reportable.
    MalformedMessage,
}

/// A directory response: a status tag plus, for statuses that prove
/// something, the proof payload.
#[derive(Debug, Clone)]
pub struct Response<P> {
    /// The status tag.
    pub status: RequestStatus,
    /// The proof payload; absent on [RequestStatus::MalformedMessage].
    pub payload: Option<P>,
}

impl<P> Response<P> {
    pub(crate) fn new(status: RequestStatus, payload: P) -> Self {
        Response {
            status,
            payload: Some(payload),
        }
    }

    pub(crate) fn error(status: RequestStatus) -> Self {
        Response {
            status,
            payload: None,
        }
    }
}

/// The payload of a registration: the proof that the name was (or was not)
/// available, the issued or conflicting temporary binding, and the latest
/// STR.
#[derive(Debug, Clone)]
pub struct RegistrationProof {
    /// Proof of the name's standing in the latest snapshot: absence when the
    /// registration was accepted, inclusion when the name was already bound.
    pub auth_path: AuthenticationPath,
    /// The issued promise on success; the previously issued promise when the
    /// name was registered earlier in the same epoch; absent when the name
    /// is already in the tree.
    pub tb: Option<TemporaryBinding>,
    /// The latest signed tree root.
    pub root: SignedTreeRoot<Config>,
}

/// The payload of a current-epoch lookup.
#[derive(Debug, Clone)]
pub struct KeyLookupProof {
    /// Proof of inclusion or absence in the latest snapshot.
    pub auth_path: AuthenticationPath,
    /// The latest signed tree root.
    pub root: SignedTreeRoot<Config>,
    /// The pending promise, when the name was registered in the current
    /// epoch and is not yet in a snapshot.
    pub tb: Option<TemporaryBinding>,
}

/// The payload of a lookup in a past epoch. Carries no temporary binding:
/// TBs do not outlive the epoch that issued them.
#[derive(Debug, Clone)]
pub struct KeyLookupInEpochProof {
    /// Proof of inclusion or absence in the requested epoch's snapshot.
    pub auth_path: AuthenticationPath,
    /// The STRs for every epoch from the requested one through the latest.
    pub roots: Vec<SignedTreeRoot<Config>>,
}

/// The payload of a monitoring request: one proof and one STR per epoch in
/// the requested range.
#[derive(Debug, Clone)]
pub struct MonitoringProof {
    /// Proofs for the monitored name, one per epoch, oldest first.
    pub auth_paths: Vec<AuthenticationPath>,
    /// The matching STRs.
    pub roots: Vec<SignedTreeRoot<Config>>,
}

/// The payload of an STR history request.
#[derive(Debug, Clone)]
pub struct STRHistory {
    /// The STRs for the requested epoch range, oldest first.
    pub roots: Vec<SignedTreeRoot<Config>>,
}
