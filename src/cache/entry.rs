//! Cache Entry Module
//!
//! Defines the structure for individual cached results.

use chrono::{DateTime, Utc};

use crate::cache::OperationKind;

// == Cache Entry ==
/// A computed result with its access metadata.
///
/// Entries live only inside the store; callers receive clones of `value`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The model output
    pub value: String,
    /// Operation that produced the value
    pub kind: OperationKind,
    /// When the entry was first stored
    pub created_at: DateTime<Utc>,
    /// When the entry was last read or overwritten
    pub last_accessed: DateTime<Utc>,
    /// Number of cache hits served by this entry
    pub hits: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry stamped with the current time.
    pub fn new(value: String, kind: OperationKind) -> Self {
        let now = Utc::now();
        Self {
            value,
            kind,
            created_at: now,
            last_accessed: now,
            hits: 0,
        }
    }

    // == Access ==
    /// Records a hit and returns a copy of the value.
    pub fn access(&mut self) -> String {
        self.hits += 1;
        self.last_accessed = Utc::now();
        self.value.clone()
    }

    // == Replace ==
    /// Overwrites the value, keeping the creation time.
    pub fn replace(&mut self, value: String, kind: OperationKind) {
        self.value = value;
        self.kind = kind;
        self.last_accessed = Utc::now();
    }
}
