//! Cache Store Module
//!
//! Bounded result store combining HashMap storage with LRU tracking.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker, OperationKind};

// == Cache Store ==
/// Fixed-capacity result storage with LRU eviction.
///
/// `len() <= capacity()` holds after every operation. The store is not
/// synchronized; `CacheService` wraps it in a mutex.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-result storage
    entries: HashMap<CacheKey, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Hit/miss/eviction counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// A capacity of zero is valid and yields a store that never retains anything.
    /// Memory grows with the entries stored, not with `capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Put ==
    /// Stores a result under `key`.
    ///
    /// Overwriting an existing key replaces the value and refreshes its recency.
    /// Inserting a new key into a full store first evicts the least recently
    /// used entry.
    pub fn put(&mut self, key: CacheKey, kind: OperationKind, value: String) {
        if self.capacity == 0 {
            self.stats.record_eviction();
            return;
        }

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.replace(value, kind);
            self.lru.touch(key);
            return;
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "Evicted least recently used entry");
            }
        }

        self.entries.insert(key, CacheEntry::new(value, kind));
        self.lru.touch(key);
    }

    // == Get ==
    /// Retrieves a copy of the result stored under `key`.
    ///
    /// A hit marks the entry most recently used. A miss returns None.
    pub fn get(&mut self, key: &CacheKey) -> Option<String> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                let value = entry.access();
                self.lru.touch(*key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Clear ==
    /// Removes every entry and returns how many were dropped. Counters survive.
    pub fn clear(&mut self) -> usize {
        let cleared = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        cleared
    }

    // == Stats ==
    /// Returns a snapshot of occupancy and counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.entries_by_kind.clear();
        for entry in self.entries.values() {
            *stats.entries_by_kind.entry(entry.kind).or_insert(0) += 1;
        }
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
impl CacheStore {
    /// Returns a copy of the stored result without touching recency or counters.
    pub(crate) fn peek(&self, key: &CacheKey) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub(crate) fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }
}
