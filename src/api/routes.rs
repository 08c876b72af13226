//! API Routes
//!
//! Configures the Axum router with all control surface endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, grammar_handler, health_handler, stats_handler, summarize_handler,
    tone_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /grammar` - Fix grammar of the submitted text
/// - `POST /summarize` - Summarize the submitted text
/// - `POST /tone` - Rewrite the submitted text in a target tone
/// - `GET /stats` - Get cache statistics
/// - `DELETE /cache` - Drop every cached result
/// - `GET /health` - Backend and cache status
///
/// # Middleware
/// - CORS: Allows any origin so browser extensions can call the local server
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/grammar", post(grammar_handler))
        .route("/summarize", post(summarize_handler))
        .route("/tone", post(tone_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
