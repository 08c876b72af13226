//! Cache Service Module
//!
//! Thread-safe, lazily built memo in front of the inference backend.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, info};

use crate::cache::{CacheKey, CacheStats, CacheStore, OperationKind, OperationOptions};
use crate::config::Config;

// == Cache Service ==
/// Keyed memo shared by every text operation.
///
/// The store is built on first `lookup` or `store`, exactly once, even when
/// several threads race to use the service. Share it as `Arc<CacheService>`.
///
/// No lock is held between a `lookup` miss and the matching `store`, so the
/// backend call in between never blocks other callers.
#[derive(Debug)]
pub struct CacheService {
    capacity: usize,
    store: OnceLock<Mutex<CacheStore>>,
}

impl CacheService {
    // == Constructor ==
    /// Creates an uninitialized service that will hold up to `capacity` results.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            store: OnceLock::new(),
        }
    }

    /// Creates a service sized by `Config::cache_size`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_size)
    }

    // == Lookup ==
    /// Returns the cached result for `(kind, text, options)`, if any.
    pub fn lookup(
        &self,
        kind: OperationKind,
        text: &str,
        options: &OperationOptions,
    ) -> Option<String> {
        let key = CacheKey::derive(kind, text, options);
        let result = self.lock_store().get(&key);

        match result {
            Some(_) => debug!(operation = %kind, %key, "Cache hit"),
            None => debug!(operation = %kind, %key, "Cache miss"),
        }
        result
    }

    // == Store ==
    /// Records `result` for `(kind, text, options)`.
    pub fn store(
        &self,
        kind: OperationKind,
        text: &str,
        options: &OperationOptions,
        result: impl Into<String>,
    ) {
        let key = CacheKey::derive(kind, text, options);
        self.lock_store().put(key, kind, result.into());
        debug!(operation = %kind, %key, "Cached result");
    }

    // == Stats ==
    /// Returns a snapshot without touching recency.
    ///
    /// Before the store exists this reports an empty cache of the configured
    /// capacity and does not build it.
    pub fn stats(&self) -> CacheStats {
        match self.store.get() {
            Some(store) => lock(store).stats(),
            None => CacheStats::new(self.capacity),
        }
    }

    // == Reset ==
    /// Drops every cached result and returns how many were removed.
    pub fn reset(&self) -> usize {
        match self.store.get() {
            Some(store) => {
                let cleared = lock(store).clear();
                info!(cleared, "Cache cleared");
                cleared
            }
            None => 0,
        }
    }

    /// True once the store has been built.
    pub fn is_ready(&self) -> bool {
        self.store.get().is_some()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock_store(&self) -> MutexGuard<'_, CacheStore> {
        let store = self.store.get_or_init(|| {
            info!(capacity = self.capacity, "Initializing result cache");
            Mutex::new(CacheStore::new(self.capacity))
        });
        lock(store)
    }
}

// Store methods restore every invariant before any point that could panic,
// so a poisoned guard still holds a consistent store.
fn lock(store: &Mutex<CacheStore>) -> MutexGuard<'_, CacheStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}
