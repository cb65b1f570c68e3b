// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Static keys and RNGs for tests.

use crate::ecvrf::VrfPrivateKey;
use crate::sign;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A fixed 32-byte seed for deterministic test keys.
pub(crate) const TEST_SEED: [u8; 32] = *b"deterministic tests need 256 bit";

/// A static signing key for tests.
pub(crate) fn static_signing_key() -> sign::PrivateKey {
    sign::PrivateKey::from_bytes(&TEST_SEED)
}

/// A static VRF key for tests.
pub(crate) fn static_vrf_key() -> VrfPrivateKey {
    VrfPrivateKey::from_bytes(&TEST_SEED)
}

/// A seeded RNG so tree nonces and salts are reproducible within a test.
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
