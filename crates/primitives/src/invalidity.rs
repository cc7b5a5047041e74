//! Surfaced when the execution engine reports an invalid payload.

use alloy_primitives::B256;

use crate::block::BlockRef;

/// The all-`0xff` sentinel substituted for an empty `last_valid_hash`
/// reported by the engine (`spec.md` §4.1.2 and boundary behavior §8).
pub const LAST_VALID_HASH_SENTINEL: B256 = B256::repeat_byte(0xff);

/// `{ root, last_valid_hash, invalid_ancestor_roots }`, surfaced upward
/// when the engine reports an invalid payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "block {root} was invalidated by the execution engine ({} descendant(s) pruned)",
    invalid_ancestor_roots.len()
)]
pub struct InvalidityRecord {
    pub root: BlockRef,
    pub last_valid_hash: B256,
    pub invalid_ancestor_roots: Vec<BlockRef>,
}

impl InvalidityRecord {
    /// Normalizes an engine-reported `last_valid_hash`, substituting the
    /// all-`0xff` sentinel when the engine left it empty.
    pub fn normalize_last_valid_hash(reported: B256) -> B256 {
        if reported.is_zero() { LAST_VALID_HASH_SENTINEL } else { reported }
    }
}
