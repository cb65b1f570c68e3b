// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Core type definitions shared across the tree, PAD, and directory layers.

use rand::{CryptoRng, Rng};

/// The number of bytes in a lookup index.
pub const INDEX_BYTES: usize = 32;

/// The private position of a binding in the Merkle prefix tree: the 32-byte
/// output of the VRF applied to a [Name].
pub type Index = [u8; INDEX_BYTES];

/// The name under which a value is registered in the directory.
///
/// Names are arbitrary byte strings; they are fed to the VRF to derive the
/// tree index and into the leaf commitment, but never stored in hashes or
/// proofs in the clear.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Name(
    #[cfg_attr(
        feature = "serde_serialization",
        serde(
            serialize_with = "crate::utils::serde_helpers::bytes_serialize_hex",
            deserialize_with = "crate::utils::serde_helpers::bytes_deserialize_hex"
        )
    )]
    pub Vec<u8>,
);

impl core::ops::Deref for Name {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::convert::From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl core::convert::From<&[u8]> for Name {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Name {
    /// Gets a random name
    pub fn random<R: CryptoRng + Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes.to_vec())
    }
}

/// The value bound to a [Name] in the directory, e.g. an encoded public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Value(
    #[cfg_attr(
        feature = "serde_serialization",
        serde(
            serialize_with = "crate::utils::serde_helpers::bytes_serialize_hex",
            deserialize_with = "crate::utils::serde_helpers::bytes_deserialize_hex"
        )
    )]
    pub Vec<u8>,
);

impl core::ops::Deref for Value {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::convert::From<&str> for Value {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl core::convert::From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Value {
    /// Gets a random value
    pub fn random<R: CryptoRng + Rng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes.to_vec())
    }
}

/// The direction of a child relative to its parent in the binary trie:
/// bit 0 selects the left subtree, bit 1 the right.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde_serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[repr(u8)]
pub enum Direction {
    /// Left
    Left = 0u8,
    /// Right
    Right = 1u8,
}

impl Direction {
    /// The direction taken at `depth` when walking towards `index`: the bit
    /// at offset `depth` of the index, counted MSB-first.
    pub fn at(index: &Index, depth: u32) -> Self {
        if crate::utils::bit_at(index, depth) {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Returns the opposite of the direction
    pub fn other(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
