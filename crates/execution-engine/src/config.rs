use serde::Deserialize;

/// Behavioral knobs for [`crate::coordinator::ExecutionEngineCoordinator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineCoordinatorConfig {
    /// Whether the node asks the engine to build a payload on every
    /// forkchoice update it's eligible to propose on (`spec.md` §4.1.1
    /// step 5). When disabled, a missing payload id on a VALID response
    /// with non-empty attributes is not logged as an error.
    pub prepare_all_payloads: bool,
    pub slots_per_epoch: u64,
    pub seconds_per_slot: u64,
    /// Trailing-slot eviction window for the payload id cache.
    pub payload_id_cache_slot_window: u64,
}

impl Default for EngineCoordinatorConfig {
    fn default() -> Self {
        Self {
            prepare_all_payloads: true,
            slots_per_epoch: 32,
            seconds_per_slot: 12,
            payload_id_cache_slot_window: 2,
        }
    }
}
