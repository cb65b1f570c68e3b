// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! The directory configuration signed into every tree root.

use crate::ecvrf::VrfPublicKey;
use crate::hash::HASH_ID;
use crate::pad::AssocData;

/// The protocol version advertised in signed tree roots.
///
/// 0.2.x fixed all hashed and serialized integers to little-endian; STRs
/// and commitments from 0.1.x hosts with a different native byte order do
/// not verify across the boundary.
pub const PROTOCOL_VERSION: &str = "0.2.0";

/// The directory's signed configuration: the protocol version, the
/// cryptographic algorithms in use, the public part of the VRF key clients
/// need to verify private indices, and the epoch policies.
///
/// The configuration is hashed into every STR as associated data, so clients
/// monitoring the STR chain notice any change to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The protocol version, as bytes of [PROTOCOL_VERSION].
    pub version: Vec<u8>,
    /// Identifies the hash algorithm, as bytes of [HASH_ID].
    pub hash_id: Vec<u8>,
    /// The public part of the directory's VRF key.
    pub vrf_public_key: VrfPublicKey,
    /// Seconds between epoch updates, when the deployment advertises one.
    pub update_interval: Option<u64>,
}

impl Config {
    /// Returns a new configuration with the given public VRF key and no
    /// advertised update interval.
    pub fn new(vrf_public_key: VrfPublicKey) -> Self {
        Config {
            version: PROTOCOL_VERSION.as_bytes().to_vec(),
            hash_id: HASH_ID.as_bytes().to_vec(),
            vrf_public_key,
            update_interval: None,
        }
    }

    /// Sets the advertised update interval.
    pub fn with_update_interval(mut self, seconds: u64) -> Self {
        self.update_interval = Some(seconds);
        self
    }
}

impl AssocData for Config {
    /// Serializes the configuration for signing: the version, the hash
    /// algorithm identifier, the VRF public key, and the update interval (8
    /// little-endian bytes) when present.
    fn bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(self.version.len() + self.hash_id.len() + 32 + 8);
        bytes.extend_from_slice(&self.version);
        bytes.extend_from_slice(&self.hash_id);
        bytes.extend_from_slice(&self.vrf_public_key.to_bytes());
        if let Some(seconds) = self.update_interval {
            bytes.extend_from_slice(&seconds.to_le_bytes());
        }
        bytes
    }
}
