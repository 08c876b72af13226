//! Cache Statistics Module
//!
//! Snapshot of cache occupancy and hit/miss/eviction counters.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::OperationKind;

// == Cache Stats ==
/// Point-in-time view of the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Stored results per operation kind
    pub entries_by_kind: BTreeMap<OperationKind, usize>,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Maximum number of entries the cache holds
    pub capacity: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries discarded to respect capacity
    pub evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates empty stats for a cache of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Entries stored for one kind, zero when absent.
    pub fn entries_for(&self, kind: OperationKind) -> usize {
        self.entries_by_kind.get(&kind).copied().unwrap_or(0)
    }
}
