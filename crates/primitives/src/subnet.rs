//! Subnet identity and the advertised bitfields carried in a node's
//! routable record.

use std::fmt;

/// Integer identifying a subnet within one of the two namespaces
/// (attestation or sync-committee). The namespaces are disjoint at the
/// type level; callers choose which one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubnetId(pub u64);

impl fmt::Display for SubnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed-width 64-bit attestation subnet bitfield, advertised under the
/// record's `attnets` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttestationBitfield(u64);

impl AttestationBitfield {
    pub const BITS: u32 = 64;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn set(&mut self, subnet: SubnetId) {
        self.0 |= 1 << (subnet.0 % u64::from(Self::BITS));
    }

    pub fn is_set(&self, subnet: SubnetId) -> bool {
        self.0 & (1 << (subnet.0 % u64::from(Self::BITS))) != 0
    }

    /// Fixed-width 8-byte little-endian wire representation.
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }
}

/// A fixed-width 4-bit sync-committee subnet bitfield, advertised under the
/// record's `syncnets` entry from the sync-committee fork onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncCommitteeBitfield(u8);

impl SyncCommitteeBitfield {
    pub const BITS: u32 = 4;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn set(&mut self, subnet: SubnetId) {
        self.0 |= 1 << (subnet.0 % u64::from(Self::BITS));
    }

    pub fn is_set(&self, subnet: SubnetId) -> bool {
        self.0 & (1 << (subnet.0 % u64::from(Self::BITS))) != 0
    }

    /// Fixed-width single-byte wire representation (low 4 bits used).
    pub fn to_bytes(self) -> [u8; 1] {
        [self.0 & 0b1111]
    }

    pub fn from_bytes(bytes: [u8; 1]) -> Self {
        Self(bytes[0] & 0b1111)
    }
}

/// Distinguishes the advertised metadata shape: V1 carries only the
/// attestation bitfield, V2 adds the sync-committee bitfield once a node
/// has crossed the sync-committee fork (`spec.md` §4.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataVersion {
    V1,
    V2,
}
