//! Versioned payload attributes, per `spec.md` §3's field-by-version table.

use alloy_eips::eip4895::Withdrawal;
use alloy_primitives::{Address, B256};
pub use alloy_rpc_types_engine::PayloadId;

use crate::block::BlockVersion;

/// Which version tag a [`PayloadAttributes`] was constructed for.
///
/// Exists mostly so error messages and tests can name the tag without
/// reaching into the payload itself.
pub type VersionedPayloadAttributesTag = BlockVersion;

/// A versioned record sent to the execution engine to request payload
/// building for the next slot.
///
/// An [`PayloadAttributes::empty`] attribute is a sentinel meaning "no
/// proposal intended this slot" — same version, no fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadAttributes {
    version: BlockVersion,
    fields: Option<alloy_rpc_types_engine::PayloadAttributes>,
}

impl PayloadAttributes {
    /// Constructs an empty (no-proposal-intended) attribute of `version`.
    pub const fn empty(version: BlockVersion) -> Self {
        Self { version, fields: None }
    }

    /// Constructs a populated attribute, validating that the supplied
    /// fields match what `version` requires (`spec.md` §3's table and
    /// design note in §9: "a single constructor that validates field
    /// presence against the tag").
    pub fn new(
        version: BlockVersion,
        timestamp: u64,
        prev_randao: B256,
        suggested_fee_recipient: Address,
        withdrawals: Option<Vec<Withdrawal>>,
        parent_beacon_block_root: Option<B256>,
    ) -> Result<Self, PayloadAttributesError> {
        if version.has_withdrawals() != withdrawals.is_some() {
            return Err(PayloadAttributesError::WithdrawalsMismatch { version });
        }
        if version.has_parent_beacon_block_root() != parent_beacon_block_root.is_some() {
            return Err(PayloadAttributesError::ParentBeaconRootMismatch { version });
        }
        Ok(Self {
            version,
            fields: Some(alloy_rpc_types_engine::PayloadAttributes {
                timestamp,
                prev_randao,
                suggested_fee_recipient,
                withdrawals,
                parent_beacon_block_root,
            }),
        })
    }

    pub const fn version(&self) -> BlockVersion {
        self.version
    }

    /// True for the "no proposal intended this slot" sentinel.
    pub const fn is_empty(&self) -> bool {
        self.fields.is_none()
    }

    /// The wire-format fields, absent for the empty sentinel.
    pub const fn fields(&self) -> Option<&alloy_rpc_types_engine::PayloadAttributes> {
        self.fields.as_ref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadAttributesError {
    #[error("withdrawals presence does not match {version:?}'s requirements")]
    WithdrawalsMismatch { version: BlockVersion },
    #[error("parent beacon block root presence does not match {version:?}'s requirements")]
    ParentBeaconRootMismatch { version: BlockVersion },
}
