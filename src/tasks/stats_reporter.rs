//! Stats Reporter Task
//!
//! Background task that periodically logs cache occupancy and hit rate.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheService, CacheStats};

/// Spawns a background task that logs cache statistics every interval.
///
/// Reading stats never touches recency, so the reporter does not disturb
/// eviction order.
///
/// # Arguments
/// * `cache` - Shared cache service
/// * `interval_secs` - Interval in seconds between reports
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_stats_reporter(cache: Arc<CacheService>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting stats reporter with interval of {} seconds", interval_secs);

        loop {
            tokio::time::sleep(interval).await;
            report(&cache);
        }
    })
}

/// Logs one snapshot and returns it.
pub fn report(cache: &CacheService) -> CacheStats {
    let stats = cache.stats();

    if stats.hits + stats.misses > 0 {
        info!(
            entries = stats.total_entries,
            capacity = stats.capacity,
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            hit_rate = stats.hit_rate(),
            "Cache stats"
        );
    } else {
        debug!("Cache stats: no lookups yet");
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{OperationKind, OperationOptions};

    #[test]
    fn test_report_does_not_build_store() {
        let cache = CacheService::new(10);

        let stats = report(&cache);

        assert_eq!(stats.capacity, 10);
        assert!(!cache.is_ready());
    }

    #[test]
    fn test_report_reflects_activity() {
        let cache = CacheService::new(10);
        let opts = OperationOptions::new();
        cache.store(OperationKind::Grammar, "a", &opts, "A");
        cache.lookup(OperationKind::Grammar, "a", &opts);
        cache.lookup(OperationKind::Grammar, "b", &opts);

        let stats = report(&cache);

        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_reporter_runs_and_can_be_aborted() {
        let cache = Arc::new(CacheService::new(10));
        cache.store(OperationKind::Summarize, "x", &OperationOptions::new(), "y");

        let handle = spawn_stats_reporter(Arc::clone(&cache), 1);
        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert!(!handle.is_finished(), "Reporter should keep running");
        // Reporting must leave entries in place
        assert_eq!(cache.stats().total_entries, 1);

        handle.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
