//! Cache Module
//!
//! Request de-duplication cache: key derivation, bounded LRU storage and the
//! thread-safe service that text operations consult before calling the model.

mod entry;
mod key;
mod lru;
mod service;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{CacheKey, OperationKind, OperationOptions};
pub use lru::LruTracker;
pub use service::CacheService;
pub use stats::CacheStats;
pub use store::CacheStore;
