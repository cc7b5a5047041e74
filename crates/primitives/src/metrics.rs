//! Write-only metrics handles, injected at construction.
//!
//! Per `spec.md` §9's design note, counters are treated as write-only
//! handles so that tests can substitute a fake that records increments
//! instead of reaching into a real metrics backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A write-only counter handle.
pub trait Counter: Send + Sync + std::fmt::Debug {
    fn increment(&self);
}

/// A counter backed by the global `metrics` crate recorder.
#[derive(Debug, Clone)]
pub struct RecorderCounter(metrics::Counter);

impl RecorderCounter {
    pub fn new(name: &'static str) -> Self {
        Self(metrics::counter!(name))
    }
}

impl Counter for RecorderCounter {
    fn increment(&self) {
        self.0.increment(1);
    }
}

/// An in-memory counter for tests, sharing its count across clones.
#[derive(Debug, Clone, Default)]
pub struct TestCounter(Arc<AtomicU64>);

impl TestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Counter for TestCounter {
    fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts_increments() {
        let counter = TestCounter::new();
        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 2);
    }
}
