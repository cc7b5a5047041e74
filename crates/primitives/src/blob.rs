//! Blob KZG commitment → versioned hash conversion.
//!
//! Dropped from the distilled spec but present in every real
//! implementation of `NotifyNewPayload` at Deneb and beyond — see
//! `SPEC_FULL.md` §1.

use alloy_primitives::B256;
use sha2::{Digest as _, Sha256};

/// Version byte identifying a KZG-commitment-derived versioned hash.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// Converts a 48-byte BLS12-381 KZG commitment into its versioned hash:
/// the version byte followed by the last 31 bytes of `sha256(commitment)`.
pub fn versioned_hash(commitment: &[u8; 48]) -> B256 {
    let digest = Sha256::digest(commitment);
    let mut out = [0u8; 32];
    out[0] = VERSIONED_HASH_VERSION_KZG;
    out[1..].copy_from_slice(&digest[1..]);
    B256::from(out)
}

/// Converts every commitment on a block into its versioned hash, in order.
pub fn versioned_hashes<'a>(commitments: impl IntoIterator<Item = &'a [u8; 48]>) -> Vec<B256> {
    commitments.into_iter().map(versioned_hash).collect()
}
