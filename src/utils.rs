// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! Bit-level helpers for 32-byte indices.
//!
//! Indices are treated as 256-bit strings read MSB-first: offset 0 is the
//! most significant bit of byte 0. Prefixes are always padded with zero bits
//! on the right to the full 32 bytes; the same convention must be used when
//! constructing empty nodes and when verifying proofs against them.

use crate::types::{Index, INDEX_BYTES};

/// Returns the bit of `index` at `offset`, counted from the most significant
/// bit of the first byte.
///
/// For example, with `index[0] == 0b1010_0000`:
/// * `bit_at(&index, 0)` is `true`
/// * `bit_at(&index, 1)` is `false`
/// * `bit_at(&index, 2)` is `true`
///
/// Panics if `offset` is out of range; callers bound tree walks to
/// [crate::MAX_DEPTH].
pub fn bit_at(index: &Index, offset: u32) -> bool {
    let byte = (offset / 8) as usize;
    let bit = offset % 8;
    (index[byte] >> (7 - bit)) & 1 == 1
}

/// Returns a copy of `index` keeping the first `len` bits and zeroing the
/// rest.
pub fn prefix(index: &Index, len: u32) -> Index {
    let mut out = [0u8; INDEX_BYTES];
    if len == 0 {
        return out;
    }
    let full_bytes = (len / 8) as usize;
    let rem_bits = len % 8;
    out[..full_bytes].copy_from_slice(&index[..full_bytes]);
    if rem_bits > 0 {
        out[full_bytes] = index[full_bytes] & (0xffu8 << (8 - rem_bits));
    }
    out
}

/// Returns a copy of `index` with the bit at `offset` set to one.
pub fn set_bit(index: &Index, offset: u32) -> Index {
    let mut out = *index;
    out[(offset / 8) as usize] |= 1 << (7 - offset % 8);
    out
}

/// The length in bits of the longest common prefix of two indices.
pub fn longest_common_prefix(a: &Index, b: &Index) -> u32 {
    for offset in 0..(INDEX_BYTES as u32 * 8) {
        if bit_at(a, offset) != bit_at(b, offset) {
            return offset;
        }
    }
    INDEX_BYTES as u32 * 8
}

/// Serde serialization helpers
#[cfg(feature = "serde_serialization")]
pub mod serde_helpers {
    use hex::{FromHex, ToHex};
    use serde::Deserialize;

    /// A serde hex serializer for bytes
    pub fn bytes_serialize_hex<S, T>(x: &T, s: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: AsRef<[u8]>,
    {
        let hex_str = &x.as_ref().encode_hex_upper::<String>();
        s.serialize_str(hex_str)
    }

    /// A serde hex deserializer for bytes
    pub fn bytes_deserialize_hex<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: AsRef<[u8]> + FromHex,
        <T as FromHex>::Error: core::fmt::Display,
    {
        let hex_str = String::deserialize(deserializer)?;
        T::from_hex(hex_str).map_err(serde::de::Error::custom)
    }
}
