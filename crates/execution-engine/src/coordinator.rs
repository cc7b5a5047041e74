//! The Execution Engine Coordinator (`spec.md` §4.1).

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use alloy_rpc_types_engine::{ForkchoiceState, PayloadId, PayloadStatusEnum};
use nodecore_primitives::{BlockRef, BlockVersion, Cancelled, InvalidityRecord, PayloadAttributes};
use tokio_util::sync::CancellationToken;

use crate::collaborators::{
    BlobStorage, BlockStore, ConsensusState, ExecutionEngine, ForkChoiceStore, NewPayloadRequest,
    ProposerRegistry, SignedBlockView, StateStore,
};
use crate::config::EngineCoordinatorConfig;
use crate::error::Error;
use crate::metrics::EngineMetrics;
use crate::payload_id_cache::PayloadIdCache;

/// Bridges consensus fork-choice with an external execution engine.
///
/// Generic over the consensus block/state types and every collaborator,
/// matching `spec.md` §6's "externalized as traits" design: this crate
/// never constructs a block, state, or engine connection itself.
pub struct ExecutionEngineCoordinator<Engine, Choice, Blocks, States, Blobs, Proposers, Block, State>
where
    Engine: ExecutionEngine,
    Choice: ForkChoiceStore,
    Blocks: BlockStore<Block>,
    States: StateStore<State>,
    Blobs: BlobStorage,
    Proposers: ProposerRegistry,
    Block: SignedBlockView,
    State: ConsensusState,
{
    engine: Arc<Engine>,
    fork_choice: Arc<Choice>,
    blocks: Arc<Blocks>,
    states: Arc<States>,
    blobs: Arc<Blobs>,
    proposers: Arc<Proposers>,
    payload_ids: PayloadIdCache,
    metrics: EngineMetrics,
    config: EngineCoordinatorConfig,
    _block: std::marker::PhantomData<fn() -> Block>,
    _state: std::marker::PhantomData<fn() -> State>,
}

impl<Engine, Choice, Blocks, States, Blobs, Proposers, Block, State>
    ExecutionEngineCoordinator<Engine, Choice, Blocks, States, Blobs, Proposers, Block, State>
where
    Engine: ExecutionEngine,
    Choice: ForkChoiceStore,
    Blocks: BlockStore<Block>,
    States: StateStore<State>,
    Blobs: BlobStorage,
    Proposers: ProposerRegistry,
    Block: SignedBlockView,
    State: ConsensusState,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: Arc<Engine>,
        fork_choice: Arc<Choice>,
        blocks: Arc<Blocks>,
        states: Arc<States>,
        blobs: Arc<Blobs>,
        proposers: Arc<Proposers>,
        config: EngineCoordinatorConfig,
    ) -> Self {
        Self {
            engine,
            fork_choice,
            blocks,
            states,
            blobs,
            proposers,
            payload_ids: PayloadIdCache::new(config.payload_id_cache_slot_window),
            metrics: EngineMetrics::new(),
            config,
            _block: std::marker::PhantomData,
            _state: std::marker::PhantomData,
        }
    }

    pub fn payload_id_cache(&self) -> &PayloadIdCache {
        &self.payload_ids
    }

    async fn forkchoice_state_for(&self, head_block: &Block) -> ForkchoiceState {
        ForkchoiceState {
            head_block_hash: head_block.block_hash(),
            safe_block_hash: self.fork_choice.unrealized_justified_payload_block_hash().await,
            finalized_block_hash: self.fork_choice.finalized_payload_block_hash().await,
        }
    }

    /// `spec.md` §4.1.1. Infallible: every recoverable failure folds into
    /// `(None, ..)` per §9's open question ("no-op, try again later").
    /// Invalid-head recovery (§4.1.2) runs in-line as a bounded loop
    /// instead of true recursion, per §9's design note.
    #[tracing::instrument(skip_all, fields(head.root = %head_root, head.slot = head_state.slot()))]
    pub async fn notify_forkchoice_updated(
        &self,
        head_block: Block,
        head_root: BlockRef,
        head_state: State,
        attributes: Option<PayloadAttributes>,
        cancel: &CancellationToken,
    ) -> (Option<PayloadId>, Option<InvalidityRecord>) {
        if cancel.is_cancelled() {
            return (None, None);
        }

        let mut block = head_block;
        let mut root = head_root;
        let mut state = head_state;
        let mut first_invalidity = None;

        loop {
            if !block.version().has_execution_payload() {
                return (None, first_invalidity);
            }
            if cancel.is_cancelled() {
                return (None, first_invalidity);
            }

            let attrs = attributes
                .clone()
                .unwrap_or_else(|| PayloadAttributes::empty(block.version()));
            let view = self.forkchoice_state_for(&block).await;

            let result = match self.engine.forkchoice_updated(view, &attrs).await {
                Ok(result) => result,
                Err(error) => {
                    tracing::warn!(%error, "engine returned an undefined forkchoice response");
                    return (None, first_invalidity);
                }
            };

            match result.payload_status.status {
                PayloadStatusEnum::Valid => {
                    self.metrics.forkchoice_updated_valid.increment();
                    if let Err(error) = self.fork_choice.set_optimistic_to_valid(root).await {
                        tracing::warn!(%error, root = %root, "failed to mark head valid in fork-choice");
                    }
                    if first_invalidity.is_some() {
                        if let Err(error) = self.fork_choice.set_canonical_head(root).await {
                            tracing::warn!(%error, root = %root, "failed to persist recovered canonical head");
                        }
                    }
                    if !attrs.is_empty() {
                        match result.payload_id {
                            Some(id) => self.payload_ids.insert(state.slot() + 1, root, id),
                            None if self.config.prepare_all_payloads => {
                                tracing::error!(
                                    root = %root,
                                    "engine returned no payload id for a non-empty forkchoice attribute"
                                );
                            }
                            None => {}
                        }
                    }
                    return (result.payload_id, first_invalidity);
                }
                PayloadStatusEnum::Syncing | PayloadStatusEnum::Accepted => {
                    self.metrics.forkchoice_updated_optimistic.increment();
                    return (result.payload_id, first_invalidity);
                }
                PayloadStatusEnum::Invalid { validation_error } => {
                    self.metrics.forkchoice_updated_invalid.increment();
                    let normalized = InvalidityRecord::normalize_last_valid_hash(
                        result.payload_status.latest_valid_hash.unwrap_or_default(),
                    );
                    let parent_root = block.parent_root();

                    let invalidated = match self
                        .fork_choice
                        .set_optimistic_to_invalid(root, parent_root, normalized)
                        .await
                    {
                        Ok(invalidated) => invalidated,
                        Err(error) => {
                            tracing::warn!(%error, root = %root, "failed to mark head invalid in fork-choice");
                            return (None, first_invalidity);
                        }
                    };

                    tracing::warn!(
                        head.slot = state.slot(),
                        head.root = %root,
                        invalid_children = invalidated.len(),
                        %validation_error,
                        "optimistic head invalidated by execution engine"
                    );

                    for invalid_root in &invalidated {
                        if let Err(error) = self.states.delete_state_from_caches(*invalid_root).await {
                            tracing::warn!(%error, root = %invalid_root, "failed to delete cached state");
                        }
                        if let Err(error) = self.blocks.delete_block(*invalid_root).await {
                            tracing::warn!(%error, root = %invalid_root, "failed to delete invalidated block");
                        }
                        if let Err(error) = self.blobs.remove(*invalid_root).await {
                            tracing::debug!(%error, root = %invalid_root, "no blobs to remove");
                        }
                    }

                    if first_invalidity.is_none() {
                        first_invalidity = Some(InvalidityRecord {
                            root,
                            last_valid_hash: normalized,
                            invalid_ancestor_roots: invalidated,
                        });
                    }

                    let new_head_root = match self.fork_choice.head().await {
                        Ok(root) => root,
                        Err(error) => {
                            tracing::warn!(%error, "failed to query fork-choice for new head");
                            return (None, first_invalidity);
                        }
                    };
                    let new_block = match self.blocks.get_block(new_head_root).await {
                        Ok(Some(block)) => block,
                        Ok(None) => {
                            tracing::warn!(root = %new_head_root, "new head block missing from store");
                            return (None, first_invalidity);
                        }
                        Err(error) => {
                            tracing::warn!(%error, root = %new_head_root, "failed to load new head block");
                            return (None, first_invalidity);
                        }
                    };
                    let new_state = match self.states.state_by_root(new_head_root).await {
                        Ok(Some(state)) => state,
                        Ok(None) => {
                            tracing::warn!(root = %new_head_root, "new head state missing from store");
                            return (None, first_invalidity);
                        }
                        Err(error) => {
                            tracing::warn!(%error, root = %new_head_root, "failed to load new head state");
                            return (None, first_invalidity);
                        }
                    };

                    root = new_head_root;
                    block = new_block;
                    state = new_state;
                }
            }
        }
    }

    /// `spec.md` §4.1.3. Pruning on `INVALID` is left to the caller via
    /// [`Self::prune_invalid_block`] — see §4.1.3's final paragraph.
    #[tracing::instrument(skip_all, fields(block.hash = %block.block_hash()))]
    pub async fn notify_new_payload(
        &self,
        pre_state_version: BlockVersion,
        block: &Block,
        cancel: &CancellationToken,
    ) -> Result<bool, Error> {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }
        if pre_state_version < BlockVersion::Bellatrix {
            return Ok(true);
        }
        if !block.execution_enabled() {
            return Ok(true);
        }

        let version = block.version();
        let versioned_hashes = if version.has_blob_versioned_hashes() {
            nodecore_primitives::blob::versioned_hashes(block.blob_kzg_commitments().iter())
        } else {
            Vec::new()
        };
        let parent_beacon_block_root =
            version.has_parent_beacon_block_root().then(|| block.parent_root().as_b256());
        let execution_requests = version.has_execution_requests().then(|| block.execution_requests()).flatten();

        let request = NewPayloadRequest {
            payload: block.encoded_payload(),
            versioned_hashes,
            parent_beacon_block_root,
            execution_requests,
        };

        let status = self.engine.new_payload(request).await.map_err(|error| {
            tracing::warn!(%error, "engine returned an undefined new_payload response");
            Error::undefined_engine(error)
        })?;

        match status.status {
            PayloadStatusEnum::Valid => {
                self.metrics.new_payload_valid.increment();
                Ok(true)
            }
            PayloadStatusEnum::Syncing | PayloadStatusEnum::Accepted => {
                self.metrics.new_payload_optimistic.increment();
                Ok(false)
            }
            PayloadStatusEnum::Invalid { validation_error } => {
                self.metrics.new_payload_invalid.increment();
                let last_valid_hash =
                    InvalidityRecord::normalize_last_valid_hash(status.latest_valid_hash.unwrap_or_default());
                tracing::warn!(%validation_error, "new payload rejected by execution engine");
                Err(Error::invalid_block(InvalidityRecord {
                    root: BlockRef::from(block.block_hash()),
                    last_valid_hash,
                    invalid_ancestor_roots: Vec::new(),
                }))
            }
        }
    }

    /// `spec.md` §4.1.5. Identical to the prune/remove half of invalid-head
    /// recovery (§4.1.2 steps 1–2), but reachable without a forkchoice
    /// round-trip so `notify_new_payload` callers can invoke it directly.
    /// Always returns an `InvalidityRecord`-carrying error on success, per
    /// §7's propagation policy.
    #[tracing::instrument(skip_all, fields(root = %root))]
    pub async fn prune_invalid_block(
        &self,
        root: BlockRef,
        parent_root: BlockRef,
        last_valid_hash: B256,
        cancel: &CancellationToken,
    ) -> Result<(), Error> {
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }

        let normalized = InvalidityRecord::normalize_last_valid_hash(last_valid_hash);
        let invalidated = self
            .fork_choice
            .set_optimistic_to_invalid(root, parent_root, normalized)
            .await
            .map_err(Error::store)?;

        for invalid_root in &invalidated {
            if let Err(error) = self.states.delete_state_from_caches(*invalid_root).await {
                tracing::warn!(%error, root = %invalid_root, "failed to delete cached state");
            }
            if let Err(error) = self.blocks.delete_block(*invalid_root).await {
                tracing::warn!(%error, root = %invalid_root, "failed to delete invalidated block");
            }
            if let Err(error) = self.blobs.remove(*invalid_root).await {
                tracing::debug!(%error, root = %invalid_root, "no blobs to remove");
            }
        }

        Err(Error::invalid_block(InvalidityRecord {
            root,
            last_valid_hash: normalized,
            invalid_ancestor_roots: invalidated,
        }))
    }

    /// `spec.md` §4.1.4. Infallible: any helper failure yields the empty
    /// attribute rather than propagating outward.
    #[tracing::instrument(skip_all, fields(slot))]
    pub async fn build_payload_attribute(
        &self,
        initial_state: State,
        slot: u64,
        head_root: BlockRef,
        cancel: &CancellationToken,
    ) -> PayloadAttributes {
        if cancel.is_cancelled() {
            return PayloadAttributes::empty(initial_state.version());
        }

        let slot_epoch = slot / self.config.slots_per_epoch;
        let state_epoch_before = initial_state.slot() / self.config.slots_per_epoch;
        let mut state = initial_state;
        let mut proposer_index = None;

        if slot_epoch == state_epoch_before {
            match state.proposer_index_at(slot) {
                Some(index) if self.proposers.is_tracked(index) => proposer_index = Some(index),
                _ => return PayloadAttributes::empty(state.version()),
            }
        }

        if slot > state.slot() {
            state = match state.advance_to_slot(slot).await {
                Ok(advanced) => advanced,
                Err(error) => {
                    tracing::debug!(%error, slot, "failed to advance state for payload attribute build");
                    return PayloadAttributes::empty(state.version());
                }
            };
        }

        if slot_epoch > state_epoch_before {
            match state.proposer_index_at(slot) {
                Some(index) if self.proposers.is_tracked(index) => proposer_index = Some(index),
                _ => return PayloadAttributes::empty(state.version()),
            }
        }

        let version = state.version();
        let timestamp = state.genesis_time() + slot * self.config.seconds_per_slot;
        let fee_recipient =
            proposer_index.map(|index| self.proposers.fee_recipient_for(index)).unwrap_or(Address::ZERO);
        let withdrawals = version.has_withdrawals().then(|| state.expected_withdrawals()).flatten();
        let parent_beacon_block_root =
            version.has_parent_beacon_block_root().then(|| head_root.as_b256());

        match PayloadAttributes::new(
            version,
            timestamp,
            state.prev_randao(),
            fee_recipient,
            withdrawals,
            parent_beacon_block_root,
        ) {
            Ok(attributes) => attributes,
            Err(error) => {
                tracing::debug!(%error, slot, "failed to construct payload attributes");
                PayloadAttributes::empty(version)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};

    use alloy_primitives::Bytes;
    use alloy_rpc_types_engine::{ForkchoiceUpdated, PayloadStatus};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::error::StoreError;
    use crate::metrics::test_support::fake_metrics;

    #[derive(Debug, Clone)]
    struct FakeBlock {
        version: BlockVersion,
        execution_enabled: bool,
        block_hash: B256,
        parent_root: BlockRef,
    }

    impl SignedBlockView for FakeBlock {
        fn version(&self) -> BlockVersion {
            self.version
        }
        fn execution_enabled(&self) -> bool {
            self.execution_enabled
        }
        fn block_hash(&self) -> B256 {
            self.block_hash
        }
        fn parent_root(&self) -> BlockRef {
            self.parent_root
        }
        fn blob_kzg_commitments(&self) -> &[[u8; 48]] {
            &[]
        }
        fn encoded_payload(&self) -> Bytes {
            Bytes::new()
        }
        fn execution_requests(&self) -> Option<Vec<Bytes>> {
            None
        }
    }

    #[derive(Debug, Clone)]
    struct FakeState {
        slot: u64,
        version: BlockVersion,
        genesis_time: u64,
        prev_randao: B256,
        proposer_by_slot: HashMap<u64, u64>,
        withdrawals: Option<Vec<alloy_eips::eip4895::Withdrawal>>,
    }

    #[async_trait]
    impl ConsensusState for FakeState {
        fn slot(&self) -> u64 {
            self.slot
        }
        fn version(&self) -> BlockVersion {
            self.version
        }
        fn genesis_time(&self) -> u64 {
            self.genesis_time
        }
        fn prev_randao(&self) -> B256 {
            self.prev_randao
        }
        fn proposer_index_at(&self, slot: u64) -> Option<u64> {
            self.proposer_by_slot.get(&slot).copied()
        }
        fn expected_withdrawals(&self) -> Option<Vec<alloy_eips::eip4895::Withdrawal>> {
            self.withdrawals.clone()
        }
        async fn advance_to_slot(&self, slot: u64) -> Result<Self, StoreError> {
            let mut advanced = self.clone();
            advanced.slot = slot;
            Ok(advanced)
        }
    }

    struct FakeEngine {
        forkchoice_responses: Mutex<VecDeque<Result<ForkchoiceUpdated, EngineRpcError>>>,
        new_payload_responses: Mutex<VecDeque<Result<PayloadStatus, EngineRpcError>>>,
    }

    impl FakeEngine {
        fn with_forkchoice_responses(responses: Vec<Result<ForkchoiceUpdated, EngineRpcError>>) -> Self {
            Self {
                forkchoice_responses: Mutex::new(responses.into()),
                new_payload_responses: Mutex::new(VecDeque::new()),
            }
        }
    }

    #[async_trait]
    impl ExecutionEngine for FakeEngine {
        async fn forkchoice_updated(
            &self,
            _state: ForkchoiceState,
            _attributes: &PayloadAttributes,
        ) -> Result<ForkchoiceUpdated, EngineRpcError> {
            self.forkchoice_responses.lock().pop_front().expect("unexpected forkchoice_updated call")
        }

        async fn new_payload(&self, _request: NewPayloadRequest) -> Result<PayloadStatus, EngineRpcError> {
            self.new_payload_responses.lock().pop_front().expect("unexpected new_payload call")
        }
    }

    struct FakeForkChoice {
        finalized: B256,
        safe: B256,
        head: Mutex<BlockRef>,
        invalidated_on_next_call: Mutex<VecDeque<Vec<BlockRef>>>,
        canonical_head: Mutex<Option<BlockRef>>,
    }

    #[async_trait]
    impl ForkChoiceStore for FakeForkChoice {
        async fn finalized_payload_block_hash(&self) -> B256 {
            self.finalized
        }
        async fn unrealized_justified_payload_block_hash(&self) -> B256 {
            self.safe
        }
        async fn set_optimistic_to_valid(&self, _root: BlockRef) -> Result<(), StoreError> {
            Ok(())
        }
        async fn set_optimistic_to_invalid(
            &self,
            _root: BlockRef,
            _parent_root: BlockRef,
            _last_valid_hash: B256,
        ) -> Result<Vec<BlockRef>, StoreError> {
            Ok(self.invalidated_on_next_call.lock().pop_front().unwrap_or_default())
        }
        async fn head(&self) -> Result<BlockRef, StoreError> {
            Ok(*self.head.lock())
        }
        async fn set_canonical_head(&self, root: BlockRef) -> Result<(), StoreError> {
            *self.canonical_head.lock() = Some(root);
            Ok(())
        }
    }

    struct FakeBlockStore {
        blocks: HashMap<BlockRef, FakeBlock>,
    }

    #[async_trait]
    impl BlockStore<FakeBlock> for FakeBlockStore {
        async fn get_block(&self, root: BlockRef) -> Result<Option<FakeBlock>, StoreError> {
            Ok(self.blocks.get(&root).cloned())
        }
        async fn delete_block(&self, _root: BlockRef) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct FakeStateStore {
        states: HashMap<BlockRef, FakeState>,
    }

    #[async_trait]
    impl StateStore<FakeState> for FakeStateStore {
        async fn state_by_root(&self, root: BlockRef) -> Result<Option<FakeState>, StoreError> {
            Ok(self.states.get(&root).cloned())
        }
        async fn delete_state_from_caches(&self, _root: BlockRef) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct FakeBlobs;

    #[async_trait]
    impl BlobStorage for FakeBlobs {
        async fn remove(&self, _root: BlockRef) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct FakeProposers {
        tracked: HashMap<u64, Address>,
    }

    impl ProposerRegistry for FakeProposers {
        fn is_tracked(&self, proposer_index: u64) -> bool {
            self.tracked.contains_key(&proposer_index)
        }
        fn fee_recipient_for(&self, proposer_index: u64) -> Address {
            self.tracked.get(&proposer_index).copied().unwrap_or(Address::ZERO)
        }
    }

    type TestCoordinator = ExecutionEngineCoordinator<
        FakeEngine,
        FakeForkChoice,
        FakeBlockStore,
        FakeStateStore,
        FakeBlobs,
        FakeProposers,
        FakeBlock,
        FakeState,
    >;

    fn coordinator_with(
        engine: FakeEngine,
        fork_choice: FakeForkChoice,
        blocks: FakeBlockStore,
        states: FakeStateStore,
        proposers: FakeProposers,
    ) -> TestCoordinator {
        ExecutionEngineCoordinator {
            engine: Arc::new(engine),
            fork_choice: Arc::new(fork_choice),
            blocks: Arc::new(blocks),
            states: Arc::new(states),
            blobs: Arc::new(FakeBlobs),
            proposers: Arc::new(proposers),
            payload_ids: PayloadIdCache::new(2),
            metrics: fake_metrics(),
            config: EngineCoordinatorConfig::default(),
            _block: std::marker::PhantomData,
            _state: std::marker::PhantomData,
        }
    }

    fn root(byte: u8) -> BlockRef {
        BlockRef::from(B256::repeat_byte(byte))
    }

    /// S1 — engine reports SYNCING: optimistic counter increments, head is
    /// not promoted to valid, and the call returns a payload id with no
    /// invalidity record.
    #[tokio::test]
    async fn s1_optimistic_forkchoice_leaves_head_optimistic() {
        let head_root = root(0xaa);
        let engine = FakeEngine::with_forkchoice_responses(vec![Ok(ForkchoiceUpdated {
            payload_status: PayloadStatus { status: PayloadStatusEnum::Syncing, latest_valid_hash: None },
            payload_id: Some(PayloadId::new([9u8; 8])),
        })]);
        let fork_choice = FakeForkChoice {
            finalized: B256::ZERO,
            safe: B256::ZERO,
            head: Mutex::new(head_root),
            invalidated_on_next_call: Mutex::new(VecDeque::new()),
            canonical_head: Mutex::new(None),
        };
        let coordinator = coordinator_with(
            engine,
            fork_choice,
            FakeBlockStore { blocks: HashMap::new() },
            FakeStateStore { states: HashMap::new() },
            FakeProposers { tracked: HashMap::new() },
        );

        let block = FakeBlock {
            version: BlockVersion::Bellatrix,
            execution_enabled: true,
            block_hash: B256::repeat_byte(0x11),
            parent_root: root(0xbb),
        };
        let state = FakeState {
            slot: 10,
            version: BlockVersion::Bellatrix,
            genesis_time: 0,
            prev_randao: B256::ZERO,
            proposer_by_slot: HashMap::new(),
            withdrawals: None,
        };

        let (payload_id, invalidity) = coordinator
            .notify_forkchoice_updated(block, head_root, state, None, &CancellationToken::new())
            .await;

        assert_eq!(payload_id, Some(PayloadId::new([9u8; 8])));
        assert!(invalidity.is_none());
    }

    /// S2 — engine reports INVALID; fork-choice invalidates the head and one
    /// descendant, the new head (0xBB) is re-notified and comes back VALID.
    #[tokio::test]
    async fn s2_invalid_head_recovers_to_new_head() {
        let bad_root = root(0xaa);
        let descendant_root = root(0xad);
        let parent_root = root(0xbb);

        let engine = FakeEngine::with_forkchoice_responses(vec![
            Ok(ForkchoiceUpdated {
                payload_status: PayloadStatus {
                    status: PayloadStatusEnum::Invalid { validation_error: "bad state root".into() },
                    latest_valid_hash: Some(B256::repeat_byte(0xcc)),
                },
                payload_id: None,
            }),
            Ok(ForkchoiceUpdated {
                payload_status: PayloadStatus { status: PayloadStatusEnum::Valid, latest_valid_hash: None },
                payload_id: Some(PayloadId::new([3u8; 8])),
            }),
        ]);
        let fork_choice = FakeForkChoice {
            finalized: B256::ZERO,
            safe: B256::ZERO,
            head: Mutex::new(parent_root),
            invalidated_on_next_call: Mutex::new(VecDeque::from([vec![bad_root, descendant_root]])),
            canonical_head: Mutex::new(None),
        };

        let parent_block = FakeBlock {
            version: BlockVersion::Bellatrix,
            execution_enabled: true,
            block_hash: B256::repeat_byte(0x22),
            parent_root: root(0xcc),
        };
        let parent_state = FakeState {
            slot: 9,
            version: BlockVersion::Bellatrix,
            genesis_time: 0,
            prev_randao: B256::ZERO,
            proposer_by_slot: HashMap::new(),
            withdrawals: None,
        };

        let mut blocks = HashMap::new();
        blocks.insert(parent_root, parent_block);
        let mut states = HashMap::new();
        states.insert(parent_root, parent_state);

        let coordinator = coordinator_with(
            engine,
            fork_choice,
            FakeBlockStore { blocks },
            FakeStateStore { states },
            FakeProposers { tracked: HashMap::new() },
        );

        let head_block = FakeBlock {
            version: BlockVersion::Bellatrix,
            execution_enabled: true,
            block_hash: B256::repeat_byte(0x11),
            parent_root,
        };
        let head_state = FakeState {
            slot: 10,
            version: BlockVersion::Bellatrix,
            genesis_time: 0,
            prev_randao: B256::ZERO,
            proposer_by_slot: HashMap::new(),
            withdrawals: None,
        };

        let (payload_id, invalidity) = coordinator
            .notify_forkchoice_updated(head_block, bad_root, head_state, None, &CancellationToken::new())
            .await;

        assert_eq!(payload_id, Some(PayloadId::new([3u8; 8])));
        let record = invalidity.expect("expected an invalidity record");
        assert_eq!(record.root, bad_root);
        assert_eq!(record.invalid_ancestor_roots, vec![bad_root, descendant_root]);
        assert_eq!(record.last_valid_hash, B256::repeat_byte(0xcc));
        assert_eq!(*coordinator.fork_choice.canonical_head.lock(), Some(parent_root));
    }

    /// S3 — state at slot 31 (epoch 0), requested slot 32 (epoch 1); the
    /// proposer is tracked only after the slot advance re-resolves the
    /// shuffling. Expect Deneb-shape attributes with a non-empty parent
    /// beacon block root.
    #[tokio::test]
    async fn s3_attribute_build_at_epoch_boundary() {
        let head_root = root(0x55);
        let mut proposer_by_slot = HashMap::new();
        proposer_by_slot.insert(32u64, 7u64);

        let state = FakeState {
            slot: 31,
            version: BlockVersion::Deneb,
            genesis_time: 1_700_000_000,
            prev_randao: B256::repeat_byte(0x44),
            proposer_by_slot,
            withdrawals: Some(vec![]),
        };

        let mut tracked = HashMap::new();
        tracked.insert(7u64, Address::repeat_byte(0x99));

        let coordinator = coordinator_with(
            FakeEngine::with_forkchoice_responses(vec![]),
            FakeForkChoice {
                finalized: B256::ZERO,
                safe: B256::ZERO,
                head: Mutex::new(head_root),
                invalidated_on_next_call: Mutex::new(VecDeque::new()),
                canonical_head: Mutex::new(None),
            },
            FakeBlockStore { blocks: HashMap::new() },
            FakeStateStore { states: HashMap::new() },
            FakeProposers { tracked },
        );

        let attributes = coordinator
            .build_payload_attribute(state, 32, head_root, &CancellationToken::new())
            .await;

        assert!(!attributes.is_empty());
        assert_eq!(attributes.version(), BlockVersion::Deneb);
        let fields = attributes.fields().expect("populated attribute");
        assert_eq!(fields.parent_beacon_block_root, Some(head_root.as_b256()));
        assert_eq!(fields.suggested_fee_recipient, Address::repeat_byte(0x99));
    }
}
