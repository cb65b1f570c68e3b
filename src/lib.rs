// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! A CONIKS-style persistent authenticated dictionary (PAD).
//!
//! A server maintains a binding from names to values (typically public keys)
//! inside a Merkle prefix tree, and once per *epoch* publishes a signed
//! commitment to the whole dictionary, the Signed Tree Root
//! ([pad::SignedTreeRoot]). Any client can then obtain a short cryptographic
//! proof, a [tree::AuthenticationPath], that a given name is, or is not,
//! bound to a particular value in a given epoch.
//!
//! # Private indices
//!
//! Names are never inserted into the tree directly. The position of a binding
//! is the 32-byte output of a verifiable random function ([ecvrf]) applied to
//! the name, so an observer of the tree learns only opaque indices. The value
//! stored at a leaf is likewise hidden behind a salted commitment
//! ([hash::Commitment]); the salt is revealed only to clients that already
//! know the name they are asking about.
//!
//! # Epochs and temporary bindings
//!
//! Writes accumulate in a pending tree and become visible when the PAD
//! advances an epoch: the pending tree is frozen into a snapshot ring of the
//! most recent `capacity` epochs, and a new STR is issued whose
//! `previous_str_hash` chains to the hash of the previous STR's signature.
//! Until a registration is included in a snapshot, the server vouches for it
//! with a signed promise, the [directory::TemporaryBinding].
//!
//! The top-level entry point is [directory::Directory], which wraps a
//! [pad::Pad] and exposes registration, lookup, monitoring, and STR-history
//! operations with tagged responses.
//!
//! # Concurrency
//!
//! The crate uses no interior mutability: all mutating operations take
//! `&mut self` and all read operations take `&self`, which is exactly the
//! single-writer / many-reader discipline the data structure requires. Wrap a
//! [directory::Directory] in the synchronization primitive of your choice to
//! share it across threads.

#![warn(missing_docs)]

pub mod directory;
pub mod ecvrf;
pub mod errors;
pub mod hash;
pub mod pad;
pub mod sign;
pub mod tree;
pub mod utils;

pub mod types;
pub use types::*;

#[cfg(test)]
pub(crate) mod test_utils;

/// The maximum depth of the Merkle prefix tree, equal to the index width in
/// bits. A tree that attempts to split below this depth holds two leaves with
/// identical 256-bit indices, i.e. a VRF collision.
pub const MAX_DEPTH: u32 = 256;
