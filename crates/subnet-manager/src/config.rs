use serde::Deserialize;

/// Protocol constants consumed by the subnet participation manager
/// (`spec.md` §6). Defaults match the reference protocol's mainnet values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubnetManagerConfig {
    pub attestation_subnet_count: u64,
    pub sync_committee_subnet_count: u64,
    pub subnets_per_node: u64,
    pub epochs_per_subnet_subscription: u64,
    pub node_id_bits: u32,
    pub attestation_subnet_prefix_bits: u32,
    pub slots_per_epoch: u64,
    pub seconds_per_slot: u64,
    pub min_peers_in_subnet_search: usize,
    /// When `Some`, clamps each discovery batch below
    /// `min_peers_in_subnet_search` (`spec.md` §4.2.3 step 3c's dial cap).
    pub max_concurrent_dials: Option<usize>,
    pub min_peers_per_subnet: usize,
    /// Disjoint-namespace offset for sync-committee subnet lock keys.
    pub sync_offset: u64,
    /// Disjoint-namespace offset for blob-sidecar subnet lock keys.
    pub blob_offset: u64,
    /// Whether the discovery loop runs at all (`spec.md` §4.2.3 step 1).
    pub discovery_enabled: bool,
}

impl Default for SubnetManagerConfig {
    fn default() -> Self {
        Self {
            attestation_subnet_count: 64,
            sync_committee_subnet_count: 4,
            subnets_per_node: 2,
            epochs_per_subnet_subscription: 256,
            node_id_bits: 256,
            attestation_subnet_prefix_bits: 6,
            slots_per_epoch: 32,
            seconds_per_slot: 12,
            min_peers_in_subnet_search: 5,
            max_concurrent_dials: None,
            min_peers_per_subnet: 3,
            sync_offset: 100,
            blob_offset: 110,
            discovery_enabled: true,
        }
    }
}
