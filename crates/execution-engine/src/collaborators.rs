//! External collaborators consumed by the coordinator (`spec.md` §6).
//!
//! None of these are implemented by this crate — the execution engine, the
//! fork-choice store, and the block/state/blob stores are explicitly out
//! of scope (`spec.md` §1's Non-goals). This module only defines the
//! seams the coordinator calls through.

use alloy_primitives::{Address, Bytes, B256};
use alloy_rpc_types_engine::{ForkchoiceState, ForkchoiceUpdated, PayloadStatus};
use async_trait::async_trait;
use nodecore_primitives::{BlockRef, BlockVersion, PayloadAttributes};

use crate::error::{EngineRpcError, StoreError};

/// The execution-engine RPC surface EEC drives (`engine_forkchoiceUpdated`,
/// `engine_newPayload`).
///
/// A single handle may itself fan out to several underlying engine
/// endpoints in a fallback arrangement (`SPEC_FULL.md` §2's supplemented
/// feature) — that composition happens behind this trait, not inside the
/// coordinator.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn forkchoice_updated(
        &self,
        state: ForkchoiceState,
        attributes: &PayloadAttributes,
    ) -> Result<ForkchoiceUpdated, EngineRpcError>;

    async fn new_payload(&self, request: NewPayloadRequest) -> Result<PayloadStatus, EngineRpcError>;
}

/// Everything `notify_new_payload` needs to hand to the engine, already
/// extracted from the signed block by the caller (block decoding and the
/// state-transition function itself are out of scope).
#[derive(Debug, Clone)]
pub struct NewPayloadRequest {
    /// Opaque engine-API-encoded execution payload.
    pub payload: Bytes,
    /// Present from Deneb onward; one entry per blob KZG commitment.
    pub versioned_hashes: Vec<B256>,
    /// Present from Deneb onward.
    pub parent_beacon_block_root: Option<B256>,
    /// Present from Electra onward.
    pub execution_requests: Option<Vec<Bytes>>,
}

/// The authoritative in-memory view of the canonical chain (`spec.md` §6).
#[async_trait]
pub trait ForkChoiceStore: Send + Sync {
    async fn finalized_payload_block_hash(&self) -> B256;
    async fn unrealized_justified_payload_block_hash(&self) -> B256;
    async fn set_optimistic_to_valid(&self, root: BlockRef) -> Result<(), StoreError>;

    /// Returns the ordered set of roots invalidated as a result (head plus
    /// descendants), per `spec.md` §4.1.2 step 1.
    async fn set_optimistic_to_invalid(
        &self,
        root: BlockRef,
        parent_root: BlockRef,
        last_valid_hash: B256,
    ) -> Result<Vec<BlockRef>, StoreError>;

    async fn head(&self) -> Result<BlockRef, StoreError>;

    /// Persists `root` as the canonical head pointer, per `spec.md` §4.1.2
    /// step 5 and §5's "prune, re-head, re-notify, save-head" ordering.
    async fn set_canonical_head(&self, root: BlockRef) -> Result<(), StoreError>;
}

/// Block storage, consumed for pruning (`spec.md` §4.1.2 step 2) and for
/// loading the new head after an invalid-head recovery (step 4).
#[async_trait]
pub trait BlockStore<Block>: Send + Sync {
    async fn get_block(&self, root: BlockRef) -> Result<Option<Block>, StoreError>;
    async fn delete_block(&self, root: BlockRef) -> Result<(), StoreError>;
}

/// State storage, consumed the same way as [`BlockStore`].
#[async_trait]
pub trait StateStore<State>: Send + Sync {
    async fn state_by_root(&self, root: BlockRef) -> Result<Option<State>, StoreError>;
    async fn delete_state_from_caches(&self, root: BlockRef) -> Result<(), StoreError>;
}

/// Blob-sidecar storage. Absence on removal is non-fatal per `spec.md`
/// §4.1.2 step 2 ("blob absence is non-fatal (debug log)").
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn remove(&self, root: BlockRef) -> Result<(), StoreError>;
}

/// Tells `build_payload_attribute` whether this node is the tracked
/// proposer for a given validator index, per `spec.md` §4.1.4 steps 1/3.
pub trait ProposerRegistry: Send + Sync {
    fn is_tracked(&self, proposer_index: u64) -> bool;
    /// The fee recipient configured for a tracked proposer. Only called
    /// after [`Self::is_tracked`] has confirmed the index is ours.
    fn fee_recipient_for(&self, proposer_index: u64) -> Address;
}

/// A consensus state, as produced by the external `ConsensusService`.
///
/// `nodecore-execution-engine` never constructs one of these itself: the
/// state-transition function is out of scope (`spec.md` §1's Non-goals).
/// It only reads the handful of fields `build_payload_attribute` needs and
/// asks the state to advance slots when necessary.
#[async_trait]
pub trait ConsensusState: Clone + Send + Sync + 'static {
    fn slot(&self) -> u64;
    fn version(&self) -> BlockVersion;
    fn genesis_time(&self) -> u64;
    fn prev_randao(&self) -> B256;
    /// `None` if the shuffling at this state does not resolve a proposer
    /// for `slot` (e.g. it falls outside the state's known epoch).
    fn proposer_index_at(&self, slot: u64) -> Option<u64>;
    /// `Some` only for Capella and beyond.
    fn expected_withdrawals(&self) -> Option<Vec<alloy_eips::eip4895::Withdrawal>>;

    /// Advances the state to `slot` using the next-slot-cache-aware
    /// transition helper (`spec.md` §4.1.4 step 2). Out of scope to
    /// implement; the coordinator only calls through this seam.
    async fn advance_to_slot(&self, slot: u64) -> Result<Self, StoreError>
    where
        Self: Sized;
}

/// A signed consensus block, as produced by the external `ConsensusService`.
pub trait SignedBlockView: Send + Sync {
    fn version(&self) -> BlockVersion;
    /// Whether the block carries an execution payload that is actually
    /// enabled (checked from header and body per `spec.md` §4.1.3 step 2).
    fn execution_enabled(&self) -> bool;
    fn block_hash(&self) -> B256;
    fn parent_root(&self) -> BlockRef;
    /// Blob KZG commitments, present from Deneb onward.
    fn blob_kzg_commitments(&self) -> &[[u8; 48]];
    /// Opaque engine-API-encoded execution payload, ready to hand to
    /// [`ExecutionEngine::new_payload`].
    fn encoded_payload(&self) -> Bytes;
    /// Execution-layer requests, present from Electra onward.
    fn execution_requests(&self) -> Option<Vec<Bytes>>;
}
