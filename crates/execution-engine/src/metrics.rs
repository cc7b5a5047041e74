//! The six engine-outcome counters of `spec.md` §6, as write-only handles.

use std::sync::Arc;

use nodecore_primitives::metrics::{Counter, RecorderCounter};

/// Counters incremented as `forkchoice_updated`/`new_payload` outcomes are
/// classified. Held behind `Arc<dyn Counter>` so tests can substitute
/// `nodecore_primitives::metrics::TestCounter` for each handle.
#[derive(Debug, Clone)]
pub struct EngineMetrics {
    pub forkchoice_updated_valid: Arc<dyn Counter>,
    pub forkchoice_updated_invalid: Arc<dyn Counter>,
    pub forkchoice_updated_optimistic: Arc<dyn Counter>,
    pub new_payload_valid: Arc<dyn Counter>,
    pub new_payload_invalid: Arc<dyn Counter>,
    pub new_payload_optimistic: Arc<dyn Counter>,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self {
            forkchoice_updated_valid: Arc::new(RecorderCounter::new("forkchoice_updated_valid_node_count")),
            forkchoice_updated_invalid: Arc::new(RecorderCounter::new(
                "forkchoice_updated_invalid_node_count",
            )),
            forkchoice_updated_optimistic: Arc::new(RecorderCounter::new(
                "forkchoice_updated_optimistic_node_count",
            )),
            new_payload_valid: Arc::new(RecorderCounter::new("new_payload_valid_node_count")),
            new_payload_invalid: Arc::new(RecorderCounter::new("new_payload_invalid_node_count")),
            new_payload_optimistic: Arc::new(RecorderCounter::new("new_payload_optimistic_node_count")),
        }
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}
