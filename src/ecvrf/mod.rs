// Copyright (c) the clonics contributors
//
// This source code is dual-licensed under either the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree or the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree. You may select, at your option, one of the above-listed licenses.

//! An elliptic-curve verifiable random function over edwards25519.
//!
//! The VRF turns a directory name into a deterministic, pseudorandom 32-byte
//! [Index] together with a proof. Only the holder of the private key can
//! compute the index for a name, so an observer of the tree learns nothing
//! about which names are bound; anyone holding the public key can check an
//! (index, proof) pair with [VrfPublicKey::verify].
//!
//! The construction follows the ECVRF-EDWARDS25519-SHA512-TAI ciphersuite
//! shape of [RFC 9381](https://www.ietf.org/rfc/rfc9381.html): hash-to-curve
//! by try-and-increment, a 16-byte challenge scalar, and cofactor clearing
//! before the output hash.

use crate::types::{Index, INDEX_BYTES};

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};


/// The ECVRF ciphersuite byte.
const SUITE: u8 = 0x03;
/// Domain separator for hashing a name to a curve point.
const DOMAIN_ENCODE: [u8; 2] = [SUITE, 0x01];
/// Domain separator for deriving the challenge scalar.
const DOMAIN_CHALLENGE: [u8; 2] = [SUITE, 0x02];
/// Domain separator for deriving the output index from gamma.
const DOMAIN_OUTPUT: [u8; 2] = [SUITE, 0x03];

/// The number of bytes in a private key.
pub const PRIVATE_KEY_LENGTH: usize = 32;
/// The number of bytes in a public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// The number of bytes in a serialized proof: gamma, the truncated challenge,
/// and the response scalar.
pub const PROOF_LENGTH: usize = 80;
/// The number of challenge bytes carried in a proof.
const CHALLENGE_LENGTH: usize = 16;

/// An error from VRF key handling or proof decoding.
#[derive(Debug, Eq, PartialEq)]
pub enum VrfError {
    /// A private key could not be constructed from the given material.
    PrivateKey(String),
    /// A public key could not be constructed from the given material.
    PublicKey(String),
    /// A proof could not be decoded.
    Proof(String),
}

impl core::fmt::Display for VrfError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (kind, msg) = match self {
            VrfError::PrivateKey(msg) => ("private key", msg),
            VrfError::PublicKey(msg) => ("public key", msg),
            VrfError::Proof(msg) => ("proof", msg),
        };
        write!(f, "VRF {kind} error: {msg}")
    }
}

/// A VRF private key: a 32-byte seed expanded on use, RFC 8032 style.
#[derive(Clone)]
pub struct VrfPrivateKey {
    seed: [u8; PRIVATE_KEY_LENGTH],
}

impl Drop for VrfPrivateKey {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl ZeroizeOnDrop for VrfPrivateKey {}

/// A VRF public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrfPublicKey {
    point: EdwardsPoint,
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// The expanded form of a private key: the clamped secret scalar and the
/// nonce-derivation half of the seed hash.
struct ExpandedKey {
    scalar: Scalar,
    nonce: [u8; 32],
}

impl Drop for ExpandedKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
        self.nonce.zeroize();
    }
}

impl VrfPrivateKey {
    /// Generates a fresh random key from the caller's CSPRNG.
    pub fn generate<R: rand::RngCore + rand::CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; PRIVATE_KEY_LENGTH];
        rng.fill_bytes(&mut seed);
        Self { seed }
    }

    /// Reconstructs a private key from its 32-byte seed.
    pub fn from_bytes(seed: &[u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self { seed: *seed }
    }

    /// The key's 32-byte seed.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.seed
    }

    /// The corresponding public key.
    pub fn public(&self) -> VrfPublicKey {
        let point = EdwardsPoint::mul_base(&self.expand().scalar);
        VrfPublicKey {
            bytes: point.compress().to_bytes(),
            point,
        }
    }

    /// Evaluates the VRF on `alpha` without producing a proof.
    pub fn evaluate(&self, alpha: &[u8]) -> Index {
        let expanded = self.expand();
        let public = self.public();
        let h_point = encode_to_curve(&public.bytes, alpha);
        index_from_gamma(&(h_point * expanded.scalar))
    }

    /// Evaluates the VRF on `alpha` and proves the evaluation, returning the
    /// index together with the proof.
    pub fn prove(&self, alpha: &[u8]) -> (Index, VrfProof) {
        let expanded = self.expand();
        let public = self.public();

        let h_point = encode_to_curve(&public.bytes, alpha);
        let h_bytes = h_point.compress().to_bytes();
        let gamma = h_point * expanded.scalar;

        let k = nonce_scalar(&expanded.nonce, &h_bytes);
        let c = challenge_scalar(
            &public.bytes,
            &h_bytes,
            &[gamma, EdwardsPoint::mul_base(&k), h_point * k],
        );
        let s = k + c * expanded.scalar;

        (index_from_gamma(&gamma), VrfProof { gamma, c, s })
    }

    fn expand(&self) -> ExpandedKey {
        let hash = Sha512::digest(self.seed);

        let mut scalar_bytes = [0u8; 32];
        scalar_bytes.copy_from_slice(&hash[..32]);
        scalar_bytes[0] &= 248;
        scalar_bytes[31] &= 63;
        scalar_bytes[31] |= 64;

        let mut nonce = [0u8; 32];
        nonce.copy_from_slice(&hash[32..]);

        // Every point the scalar multiplies here is in the prime-order
        // subgroup, so reducing the clamped bytes mod l yields the same
        // group elements as the unreduced RFC 8032 scalar.
        let expanded = ExpandedKey {
            scalar: Scalar::from_bytes_mod_order(scalar_bytes),
            nonce,
        };
        scalar_bytes.zeroize();
        expanded
    }
}

impl core::convert::TryFrom<&[u8]> for VrfPrivateKey {
    type Error = VrfError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let seed: [u8; PRIVATE_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            VrfError::PrivateKey(format!("expected a {PRIVATE_KEY_LENGTH} byte private key"))
        })?;
        Ok(Self::from_bytes(&seed))
    }
}

impl VrfPublicKey {
    /// Verifies that `(index, proof)` is the VRF evaluation of `alpha` under
    /// this key. Returns `true` if and only if the pair was produced by
    /// [VrfPrivateKey::prove] with the matching private key; flipping any bit
    /// of the index or the proof makes this return `false`.
    pub fn verify(&self, alpha: &[u8], index: &Index, proof: &VrfProof) -> bool {
        let h_point = encode_to_curve(&self.bytes, alpha);
        let u = EdwardsPoint::mul_base(&proof.s) - self.point * proof.c;
        let v = h_point * proof.s - proof.gamma * proof.c;

        let expected_c = challenge_scalar(
            &self.bytes,
            &h_point.compress().to_bytes(),
            &[proof.gamma, u, v],
        );

        proof.c == expected_c && index_from_gamma(&proof.gamma) == *index
    }

    /// The key's byte encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.bytes
    }
}

impl core::convert::TryFrom<&[u8]> for VrfPublicKey {
    type Error = VrfError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            VrfError::PublicKey(format!("expected a {PUBLIC_KEY_LENGTH} byte public key"))
        })?;
        let point = decode_point(arr)
            .ok_or_else(|| VrfError::PublicKey("not a canonical curve point".to_string()))?;
        // Small-order points would make every proof verify against every
        // input; ed25519's cofactor is 8.
        if point.is_small_order() {
            return Err(VrfError::PublicKey("small-order point".to_string()));
        }
        Ok(Self { point, bytes: arr })
    }
}

/// A proof that an index is the VRF evaluation of some input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrfProof {
    gamma: EdwardsPoint,
    c: Scalar,
    s: Scalar,
}

impl VrfProof {
    /// The index this proof evaluates to.
    pub fn index(&self) -> Index {
        index_from_gamma(&self.gamma)
    }

    /// Serializes the proof to its [PROOF_LENGTH]-byte wire form.
    pub fn to_bytes(&self) -> [u8; PROOF_LENGTH] {
        let mut out = [0u8; PROOF_LENGTH];
        out[..32].copy_from_slice(&self.gamma.compress().to_bytes());
        out[32..32 + CHALLENGE_LENGTH].copy_from_slice(&self.c.to_bytes()[..CHALLENGE_LENGTH]);
        out[32 + CHALLENGE_LENGTH..].copy_from_slice(&self.s.to_bytes());
        out
    }
}

impl core::convert::TryFrom<&[u8]> for VrfProof {
    type Error = VrfError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != PROOF_LENGTH {
            return Err(VrfError::Proof(format!(
                "expected a {PROOF_LENGTH} byte proof"
            )));
        }

        let mut gamma_bytes = [0u8; 32];
        gamma_bytes.copy_from_slice(&bytes[..32]);
        let gamma = decode_point(gamma_bytes)
            .ok_or_else(|| VrfError::Proof("gamma is not a canonical curve point".to_string()))?;

        let mut c_bytes = [0u8; 32];
        c_bytes[..CHALLENGE_LENGTH].copy_from_slice(&bytes[32..32 + CHALLENGE_LENGTH]);
        let mut s_bytes = [0u8; 32];
        s_bytes.copy_from_slice(&bytes[32 + CHALLENGE_LENGTH..]);

        Ok(Self {
            gamma,
            c: Scalar::from_bytes_mod_order(c_bytes),
            s: Scalar::from_bytes_mod_order(s_bytes),
        })
    }
}

/// Decodes a compressed point, rejecting non-canonical encodings by
/// round-tripping through compression.
fn decode_point(bytes: [u8; 32]) -> Option<EdwardsPoint> {
    let compressed = CompressedEdwardsY(bytes);
    let point = compressed.decompress()?;
    if point.compress() != compressed {
        return None;
    }
    Some(point)
}

/// Hashes `alpha` to a prime-order curve point by try-and-increment
/// ([RFC 9381 §5.4.1.1](https://www.ietf.org/rfc/rfc9381.html#section-5.4.1.1)).
fn encode_to_curve(public_key: &[u8; PUBLIC_KEY_LENGTH], alpha: &[u8]) -> EdwardsPoint {
    for counter in 0u8..=u8::MAX {
        let hash = Sha512::new()
            .chain_update(DOMAIN_ENCODE)
            .chain_update(public_key)
            .chain_update(alpha)
            .chain_update([counter, 0x00])
            .finalize();
        let mut candidate = [0u8; 32];
        candidate.copy_from_slice(&hash[..32]);

        if let Some(point) = decode_point(candidate) {
            let cleared = point.mul_by_cofactor();
            if !cleared.is_identity() {
                return cleared;
            }
        }
    }
    // Each attempt succeeds with probability about 1/2.
    panic!("try-and-increment failed to find a curve point in 256 attempts");
}

/// Derives the proof nonce from the secret nonce half and the encoded input
/// point.
fn nonce_scalar(nonce: &[u8; 32], h_bytes: &[u8; 32]) -> Scalar {
    let hash = Sha512::new().chain_update(nonce).chain_update(h_bytes).finalize();
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hash[..]);
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Derives the challenge scalar from the public key, the encoded input point,
/// and the proof points, truncated to [CHALLENGE_LENGTH] bytes.
fn challenge_scalar(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    h_bytes: &[u8; 32],
    points: &[EdwardsPoint; 3],
) -> Scalar {
    let mut hasher = Sha512::new()
        .chain_update(DOMAIN_CHALLENGE)
        .chain_update(public_key)
        .chain_update(h_bytes);
    for point in points {
        hasher.update(point.compress().to_bytes());
    }
    hasher.update([0x00]);

    let mut c_bytes = [0u8; 32];
    c_bytes[..CHALLENGE_LENGTH].copy_from_slice(&hasher.finalize()[..CHALLENGE_LENGTH]);
    Scalar::from_bytes_mod_order(c_bytes)
}

/// Derives the 32-byte output index from gamma, clearing the cofactor first.
fn index_from_gamma(gamma: &EdwardsPoint) -> Index {
    let hash = Sha512::new()
        .chain_update(DOMAIN_OUTPUT)
        .chain_update(gamma.mul_by_cofactor().compress().to_bytes())
        .chain_update([0x00])
        .finalize();
    let mut index = [0u8; INDEX_BYTES];
    index.copy_from_slice(&hash[..INDEX_BYTES]);
    index
}
