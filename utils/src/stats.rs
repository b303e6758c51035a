//! Outcome counters.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe set of counters keyed by a caller-defined enum.
///
/// Keys are registered up front; incrementing an unregistered key is a no-op.
pub struct StatsCounter<K> {
    counters: HashMap<K, AtomicU64>,
}

impl<K: Copy + Eq + Hash> StatsCounter<K> {
    pub fn new(keys: &[K]) -> Self {
        Self {
            counters: keys.iter().map(|&k| (k, AtomicU64::new(0))).collect(),
        }
    }

    pub fn increment(&self, key: K) {
        if let Some(counter) = self.counters.get(&key) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get(&self, key: K) -> u64 {
        self.counters
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}
