//! Response DTOs for the control surface
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, OperationKind};
use crate::text::ProcessedText;

/// Response body for the text operation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct TextResponse {
    /// Processed text to write back
    pub text: String,
    /// Text as submitted
    pub original: String,
    pub operation: OperationKind,
    /// Whether the result came from the cache
    pub from_cache: bool,
    /// Backend time in milliseconds, 0 for cache hits
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_tone: Option<String>,
}

impl From<ProcessedText> for TextResponse {
    fn from(processed: ProcessedText) -> Self {
        Self {
            text: processed.text,
            original: processed.original,
            operation: processed.operation,
            from_cache: processed.from_cache,
            processing_time_ms: processed.processing_time.as_millis() as u64,
            target_tone: processed.target_tone.map(|tone| tone.to_string()),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Entries dropped by the clear
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached results", cleared),
            cleared,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" when the backend is loaded, "degraded" otherwise
    pub status: String,
    /// Backend name
    pub backend: String,
    pub backend_loaded: bool,
    /// Whether the result cache has been built
    pub cache_ready: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn new(backend: impl Into<String>, backend_loaded: bool, cache_ready: bool) -> Self {
        let status = if backend_loaded { "healthy" } else { "degraded" };
        Self {
            status: status.to_string(),
            backend: backend.into(),
            backend_loaded,
            cache_ready,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
