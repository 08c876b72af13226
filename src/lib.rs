//! Typify - Local LLM text assistant
//!
//! Grammar fixes, summaries and tone changes from a locally hosted model,
//! with a bounded LRU cache that skips repeated model calls.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod text;

pub use api::AppState;
pub use backend::{InferenceBackend, LlamaServerBackend};
pub use cache::CacheService;
pub use config::Config;
pub use error::TypifyError;
pub use tasks::spawn_stats_reporter;
pub use text::TextOperations;
