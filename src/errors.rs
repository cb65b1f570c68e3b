// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Errors for PAD operations.
//!
//! Only recoverable conditions appear here; violated tree invariants (a walk
//! past the maximum depth, i.e. a VRF collision) are unreachable in a correct
//! deployment and panic instead, cryptographic verification failures are
//! ordinary `false` results, and key-material parsing failures surface as
//! [crate::ecvrf::VrfError] at the parsing boundary, before a PAD exists.

use core::fmt;

/// An error from a [crate::pad::Pad] operation.
#[derive(Debug, Eq, PartialEq)]
pub enum PadError {
    /// A snapshot ring must retain at least the latest epoch.
    InvalidCapacity,
    /// The requested epoch is not retained: either it was evicted from the
    /// snapshot ring or it has not happened yet.
    EpochOutOfWindow {
        /// The requested epoch.
        epoch: u64,
        /// The oldest retained epoch.
        oldest: u64,
        /// The latest retained epoch.
        latest: u64,
    },
}

impl fmt::Display for PadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCapacity => {
                write!(f, "the snapshot capacity must be at least 1")
            }
            Self::EpochOutOfWindow {
                epoch,
                oldest,
                latest,
            } => {
                write!(
                    f,
                    "epoch {epoch} is outside the retained window [{oldest}, {latest}]"
                )
            }
        }
    }
}
