//! Instrumentation for subnet subscriptions and per-topic peer counts
//! (`SPEC_FULL.md` §3 — the ambient-stack rule that Non-goals around
//! metrics backends exclude the backend, not the call sites).

use std::sync::Arc;

use nodecore_primitives::metrics::{Counter, RecorderCounter};

#[derive(Debug, Clone)]
pub struct SubnetManagerMetrics {
    pub subnets_subscribed: Arc<dyn Counter>,
    pub discovery_batches_completed: Arc<dyn Counter>,
}

impl SubnetManagerMetrics {
    pub fn new() -> Self {
        Self {
            subnets_subscribed: Arc::new(RecorderCounter::new("subnets_subscribed_count")),
            discovery_batches_completed: Arc::new(RecorderCounter::new("discovery_batches_completed_count")),
        }
    }
}

impl Default for SubnetManagerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
