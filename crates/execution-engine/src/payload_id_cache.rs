//! `(slot, head_root) -> payload_id`, bounded by a trailing slot window
//! (`spec.md` §3's `PayloadIDCache`).

use std::collections::BTreeMap;

use alloy_rpc_types_engine::PayloadId;
use nodecore_primitives::BlockRef;
use parking_lot::Mutex;

#[derive(Debug)]
pub struct PayloadIdCache {
    window: u64,
    entries: Mutex<BTreeMap<(u64, BlockRef), PayloadId>>,
}

impl PayloadIdCache {
    pub fn new(window: u64) -> Self {
        Self { window, entries: Mutex::new(BTreeMap::new()) }
    }

    /// Inserts `(slot, root) -> id`, then evicts every entry older than
    /// `slot - window`.
    pub fn insert(&self, slot: u64, root: BlockRef, id: PayloadId) {
        let mut entries = self.entries.lock();
        entries.insert((slot, root), id);
        let floor = slot.saturating_sub(self.window);
        entries.retain(|(entry_slot, _), _| *entry_slot >= floor);
    }

    pub fn get(&self, slot: u64, root: BlockRef) -> Option<PayloadId> {
        self.entries.lock().get(&(slot, root)).cloned()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    fn id(byte: u8) -> PayloadId {
        PayloadId::new([byte; 8])
    }

    #[test]
    fn round_trips_an_entry() {
        let cache = PayloadIdCache::new(2);
        let root = BlockRef::from(B256::repeat_byte(1));
        cache.insert(10, root, id(1));
        assert_eq!(cache.get(10, root), Some(id(1)));
    }

    #[test]
    fn evicts_entries_outside_the_slot_window() {
        let cache = PayloadIdCache::new(2);
        let root_a = BlockRef::from(B256::repeat_byte(1));
        let root_b = BlockRef::from(B256::repeat_byte(2));
        cache.insert(10, root_a, id(1));
        cache.insert(13, root_b, id(2));
        assert_eq!(cache.get(10, root_a), None);
        assert_eq!(cache.get(13, root_b), Some(id(2)));
        assert_eq!(cache.len(), 1);
    }
}
