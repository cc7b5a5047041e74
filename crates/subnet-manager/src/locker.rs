//! Shared subnet lock registry (`spec.md` §4.2.5).

use std::collections::HashMap;
use std::sync::Arc;

use nodecore_primitives::SubnetId;
use parking_lot::Mutex;
use tokio::sync::RwLock;

use crate::config::SubnetManagerConfig;

/// Lazily creates and caches per-subnet RW-locks behind a single outer
/// mutex. Attestation, sync-committee, and blob-sidecar subnets share one
/// registry by keying on `subnet_id + namespace_offset`.
#[derive(Default)]
pub struct SubnetLocker {
    locks: Mutex<HashMap<u64, Arc<RwLock<()>>>>,
}

impl SubnetLocker {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn attestation_key(subnet: SubnetId) -> u64 {
        subnet.0
    }

    pub const fn sync_key(subnet: SubnetId, config: &SubnetManagerConfig) -> u64 {
        subnet.0 + config.sync_offset
    }

    pub const fn blob_key(subnet: SubnetId, config: &SubnetManagerConfig) -> u64 {
        subnet.0 + config.blob_offset
    }

    /// Returns the lock for `key`, creating it on first access.
    pub fn lock_for(&self, key: u64) -> Arc<RwLock<()>> {
        self.locks.lock().entry(key).or_insert_with(|| Arc::new(RwLock::new(()))).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_stay_disjoint_under_default_offsets() {
        let config = SubnetManagerConfig::default();
        let att = SubnetLocker::attestation_key(SubnetId(config.attestation_subnet_count - 1));
        let sync = SubnetLocker::sync_key(SubnetId(config.sync_committee_subnet_count - 1), &config);
        let blob = SubnetLocker::blob_key(SubnetId(0), &config);
        assert!(att < config.sync_offset);
        assert!(sync < config.blob_offset);
        assert!(blob > sync);
    }

    #[test]
    fn repeated_lookups_return_the_same_lock_instance() {
        let locker = SubnetLocker::new();
        let a = locker.lock_for(5);
        let b = locker.lock_for(5);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
