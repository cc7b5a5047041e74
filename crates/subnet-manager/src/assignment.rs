//! Deterministic attestation-subnet assignment (`spec.md` §4.2.1).

use alloy_primitives::U256;
use nodecore_primitives::subnet::SubnetId;
use sha2::{Digest as _, Sha256};

use crate::collaborators::Shuffle;
use crate::config::SubnetManagerConfig;

/// `{ subnets, expires_at }`, cached per node and recomputed once expired
/// (`spec.md` §3's `PersistentSubnetAssignment`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentSubnetAssignment {
    pub subnets: Vec<SubnetId>,
    pub expires_at: jiff::Timestamp,
}

/// Computes `subnets(node_id, epoch)` and its expiry, per `spec.md` §4.2.1's
/// formula. A pure function of `(node_id, epoch, config)` plus the shuffle
/// collaborator and the current wall-clock time (needed only to anchor
/// `expires_at`; the subnet sequence itself never depends on `now`).
pub fn persistent_subnet_assignment(
    shuffle: &dyn Shuffle,
    node_id: U256,
    epoch: u64,
    config: &SubnetManagerConfig,
    now: jiff::Timestamp,
) -> PersistentSubnetAssignment {
    let window = config.epochs_per_subnet_subscription;
    let node_offset: u64 = (node_id % U256::from(window)).to::<u64>();
    let node_id_prefix: u64 = (node_id >> (config.node_id_bits - config.attestation_subnet_prefix_bits)
        as usize)
        .to::<u64>();

    let seed_input = (node_offset + epoch) / window;
    let mut hasher = Sha256::new();
    hasher.update(seed_input.to_le_bytes());
    let digest = hasher.finalize();
    let mut permutation_seed = [0u8; 32];
    permutation_seed.copy_from_slice(&digest);

    let index_count = 1u64 << config.attestation_subnet_prefix_bits;
    let permuted_prefix = shuffle.shuffled_index(node_id_prefix, index_count, permutation_seed);

    let subnets = (0..config.subnets_per_node)
        .map(|index| SubnetId((permuted_prefix + index) % config.attestation_subnet_count))
        .collect();

    let expiration_epochs = window - ((node_offset + epoch) % window);
    let expires_in_seconds = expiration_epochs * config.slots_per_epoch * config.seconds_per_slot;
    let expires_at = now
        .checked_add(jiff::SignedDuration::from_secs(expires_in_seconds as i64))
        .expect("expiry horizon fits within jiff's timestamp range");

    PersistentSubnetAssignment { subnets, expires_at }
}
