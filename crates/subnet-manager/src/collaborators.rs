//! External collaborators consumed by the subnet participation manager
//! (`spec.md` §6). The discovery protocol, the record's wire format, and
//! the deterministic shuffle itself are all out of scope (`spec.md` §1) —
//! this module only defines the seams the manager calls through.

use std::pin::Pin;

use alloy_primitives::Bytes;
use async_trait::async_trait;
use futures::Stream;
use nodecore_primitives::subnet::{AttestationBitfield, SyncCommitteeBitfield};

use crate::error::StoreError;

/// The shared protocol shuffle (`spec.md` §4.2.1's `shuffled_index`), a
/// cryptographic primitive explicitly out of scope for this crate.
pub trait Shuffle: Send + Sync {
    /// Maps `index` into `[0, index_count)` under `seed`.
    fn shuffled_index(&self, index: u64, index_count: u64, seed: [u8; 32]) -> u64;
}

/// A candidate peer surfaced by discovery's random-walk iterator, already
/// carrying the advertised bitfields needed to evaluate a subnet predicate.
#[derive(Debug, Clone)]
pub struct DiscoveredNode {
    pub attestation_bitfield: AttestationBitfield,
    pub sync_bitfield: SyncCommitteeBitfield,
    /// Opaque peer address in whatever encoding the transport uses.
    pub address: Bytes,
}

/// Discovery's random-walk node source and topic-suffixing helper
/// (`spec.md` §4.2.3 step 2, §6).
pub trait Discovery: Send + Sync {
    fn random_nodes(&self) -> Pin<Box<dyn Stream<Item = DiscoveredNode> + Send + '_>>;
    /// Appends the protocol suffix to a bare topic name.
    fn topic_suffixed(&self, topic: &str) -> String;
}

/// Pubsub peer accounting, consumed by both the discovery loop and
/// [`crate::discovery::SubnetDiscovery::has_peer_with_subnet`].
#[async_trait]
pub trait PeerPool: Send + Sync {
    async fn peer_count_for_topic(&self, topic: &str) -> usize;
}

/// Converts a discovered node into a dial attempt.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(&self, node: DiscoveredNode) -> Result<(), StoreError>;
}

/// The node's own routable record (`spec.md` §4.2.2). Write methods are
/// called only while [`crate::record::SubnetRecordUpdater`] holds its
/// writer lock, which is what makes the triple write atomic to observers.
#[async_trait]
pub trait NodeRecord: Send + Sync {
    async fn set_attestation_bitfield(&self, bitfield: AttestationBitfield) -> Result<(), StoreError>;
    async fn set_sync_bitfield(&self, bitfield: SyncCommitteeBitfield) -> Result<(), StoreError>;
    async fn bump_sequence_number(&self) -> Result<u64, StoreError>;
}
