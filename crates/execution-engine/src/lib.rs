//! The Execution Engine Coordinator: bridges consensus fork-choice with an
//! external execution engine (`spec.md` §4.1).

pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod metrics;
pub mod payload_id_cache;

pub use collaborators::{
    BlobStorage, BlockStore, ConsensusState, ExecutionEngine, ForkChoiceStore, NewPayloadRequest,
    ProposerRegistry, SignedBlockView, StateStore,
};
pub use config::EngineCoordinatorConfig;
pub use coordinator::ExecutionEngineCoordinator;
pub use error::{EngineRpcError, Error, StoreError};
pub use metrics::EngineMetrics;
pub use payload_id_cache::PayloadIdCache;
