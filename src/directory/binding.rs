// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Temporary bindings: signed promises of inclusion in the next epoch.

use crate::sign;
use crate::types::{Index, Value};

/// A temporary binding (TB): the private index of a newly registered name,
/// its value, and the directory's signature over both together with the
/// latest STR's signature.
///
/// A TB is issued at registration and serves as a signed promise that the
/// binding will appear in the next snapshot, letting clients use a fresh
/// binding without waiting out the epoch. It lives for at most one epoch:
/// all outstanding TBs are dropped when the directory updates, because the
/// bindings they promised are in the tree from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TemporaryBinding {
    /// The VRF index the binding will occupy.
    pub index: Index,
    /// The promised value.
    pub value: Value,
    /// The signature over [TemporaryBinding::bytes].
    pub signature: Vec<u8>,
}

impl TemporaryBinding {
    /// The signed byte string: the latest STR's signature, the index, and
    /// the value, concatenated. All three fields are fixed-width or
    /// unambiguous by position.
    pub fn bytes(&self, str_signature: &[u8]) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(str_signature.len() + self.index.len() + self.value.len());
        bytes.extend_from_slice(str_signature);
        bytes.extend_from_slice(&self.index);
        bytes.extend_from_slice(&self.value);
        bytes
    }

    /// Verifies the promise against the signature of the STR it was issued
    /// under.
    pub fn verify(&self, public_key: &sign::PublicKey, str_signature: &[u8]) -> bool {
        public_key.verify(&self.bytes(str_signature), &self.signature)
    }
}
