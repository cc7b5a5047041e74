//! Consensus block identity and fork-level versioning.

use std::fmt;

use alloy_primitives::B256;

/// A 32-byte root identifying a consensus block.
///
/// The all-zero root is reserved as a sentinel meaning "not set" — see
/// [`BlockRef::is_unset`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockRef(pub B256);

impl BlockRef {
    /// The sentinel "not set" root.
    pub const UNSET: Self = Self(B256::ZERO);

    pub const fn new(root: B256) -> Self {
        Self(root)
    }

    /// Whether this ref is the zero-root sentinel.
    pub fn is_unset(&self) -> bool {
        self.0 == B256::ZERO
    }

    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for BlockRef {
    fn from(root: B256) -> Self {
        Self(root)
    }
}

impl fmt::Debug for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockRef({self})")
    }
}

impl fmt::Display for BlockRef {
    /// Truncated hex, matching the "head root (truncated hex)" logging
    /// requirement of `spec.md` §7.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}..", &self.0[..4].iter().map(|b| format!("{b:02x}")).collect::<String>())
    }
}

/// An enumerated fork level, ordered from oldest to newest.
///
/// Gates whether execution payloads exist on a block at all, and which
/// [`crate::payload::PayloadAttributes`] field shape applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockVersion {
    PreBellatrix,
    Bellatrix,
    Capella,
    Deneb,
    Electra,
}

impl BlockVersion {
    /// Whether a block at this version carries an execution payload at all.
    pub const fn has_execution_payload(self) -> bool {
        !matches!(self, Self::PreBellatrix)
    }

    pub const fn has_withdrawals(self) -> bool {
        matches!(self, Self::Capella | Self::Deneb | Self::Electra)
    }

    pub const fn has_parent_beacon_block_root(self) -> bool {
        matches!(self, Self::Deneb | Self::Electra)
    }

    pub const fn has_blob_versioned_hashes(self) -> bool {
        matches!(self, Self::Deneb | Self::Electra)
    }

    pub const fn has_execution_requests(self) -> bool {
        matches!(self, Self::Electra)
    }
}

/// The execution-layer identity of a consensus block's embedded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPayloadSummary {
    pub block_hash: B256,
    pub parent_hash: B256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_root_is_unset() {
        assert!(BlockRef::UNSET.is_unset());
        assert!(BlockRef::from(B256::ZERO).is_unset());
        assert!(!BlockRef::from(B256::repeat_byte(1)).is_unset());
    }

    #[test]
    fn version_ordering_matches_fork_order() {
        assert!(BlockVersion::PreBellatrix < BlockVersion::Bellatrix);
        assert!(BlockVersion::Bellatrix < BlockVersion::Capella);
        assert!(BlockVersion::Capella < BlockVersion::Deneb);
        assert!(BlockVersion::Deneb < BlockVersion::Electra);
    }

    #[test]
    fn field_gates_match_spec_table() {
        assert!(!BlockVersion::Bellatrix.has_withdrawals());
        assert!(BlockVersion::Capella.has_withdrawals());
        assert!(!BlockVersion::Capella.has_parent_beacon_block_root());
        assert!(BlockVersion::Deneb.has_parent_beacon_block_root());
        assert!(BlockVersion::Deneb.has_blob_versioned_hashes());
        assert!(!BlockVersion::Deneb.has_execution_requests());
        assert!(BlockVersion::Electra.has_execution_requests());
    }
}
