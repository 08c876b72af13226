//! Typify - Local LLM text assistant
//!
//! Serves grammar fix, summarize and tone change over a local HTTP control
//! surface, backed by a llama.cpp server and a bounded result cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use typify::api::{create_router, AppState};
use typify::{spawn_stats_reporter, CacheService, Config, LlamaServerBackend, TextOperations};

/// Main entry point for the Typify server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to the inference server (blocking client, outside the runtime)
/// 4. Wire the cache service and text operations
/// 5. Start the stats reporter and the HTTP control surface
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typify=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Typify");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: cache_size={}, port={}, backend={}, stats_interval={}s",
        config.cache_size, config.server_port, config.backend_url, config.stats_interval
    );

    // The blocking client owns its own runtime; keep a handle here so the
    // last reference is dropped outside the async context.
    let backend = Arc::new(
        LlamaServerBackend::from_config(&config).context("failed to build backend client")?,
    );
    if !backend.probe() {
        warn!("Inference server not available; only cached results will be served");
    }

    let cache = Arc::new(CacheService::from_config(&config));
    let ops = TextOperations::new(backend.clone(), cache.clone(), config.generation.clone());

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(serve(config, cache, AppState::new(ops)))?;

    drop(runtime);
    drop(backend);
    info!("Server shutdown complete");
    Ok(())
}

async fn serve(config: Config, cache: Arc<CacheService>, state: AppState) -> anyhow::Result<()> {
    let reporter = (config.stats_interval > 0)
        .then(|| spawn_stats_reporter(cache, config.stats_interval));

    let app = create_router(state);

    // Local-only surface
    let addr = SocketAddr::from(([127, 0, 0, 1], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(reporter))
        .await
        .context("server error")
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the stats reporter and allows graceful shutdown.
async fn shutdown_signal(reporter: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = reporter {
        handle.abort();
        warn!("Stats reporter aborted");
    }
}
