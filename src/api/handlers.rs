//! API Handlers
//!
//! HTTP request handlers for each control surface endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::{OperationKind, OperationOptions};
use crate::error::{Result, TypifyError};
use crate::models::{
    ClearResponse, HealthResponse, StatsResponse, TextRequest, TextResponse, ToneRequest,
};
use crate::text::{TextOperations, TONE_OPTION};

/// Application state shared across all handlers.
///
/// Holds the text operations façade, which in turn owns the shared cache.
#[derive(Clone)]
pub struct AppState {
    pub ops: Arc<TextOperations>,
}

impl AppState {
    /// Creates a new AppState around the given façade.
    pub fn new(ops: TextOperations) -> Self {
        Self { ops: Arc::new(ops) }
    }
}

/// Dispatches one text operation on the blocking pool.
///
/// Backend calls are synchronous and slow, so they never run on a runtime worker.
async fn dispatch(
    state: &AppState,
    kind: OperationKind,
    text: String,
    options: OperationOptions,
) -> Result<Json<TextResponse>> {
    let ops = Arc::clone(&state.ops);
    let processed = tokio::task::spawn_blocking(move || ops.process(kind, &text, &options))
        .await
        .map_err(|e| TypifyError::Internal(format!("text operation task failed: {}", e)))??;
    Ok(Json(processed.into()))
}

/// Handler for POST /grammar
pub async fn grammar_handler(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<TextResponse>> {
    req.validate()?;
    dispatch(&state, OperationKind::Grammar, req.text, OperationOptions::new()).await
}

/// Handler for POST /summarize
pub async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<TextResponse>> {
    req.validate()?;
    dispatch(&state, OperationKind::Summarize, req.text, OperationOptions::new()).await
}

/// Handler for POST /tone
///
/// The tone is checked before any cache or backend work.
pub async fn tone_handler(
    State(state): State<AppState>,
    Json(req): Json<ToneRequest>,
) -> Result<Json<TextResponse>> {
    let tone = req.tone()?;
    let options = OperationOptions::new().with(TONE_OPTION, tone.as_str());
    dispatch(&state, OperationKind::ToneChange, req.text, options).await
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.ops.cache().stats().into())
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse::new(state.ops.cache().reset()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        state.ops.backend_name(),
        state.ops.is_available(),
        state.ops.cache().is_ready(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::cache::CacheService;
    use crate::config::GenerationConfig;

    fn state_with(backend: MockBackend) -> AppState {
        AppState::new(TextOperations::new(
            Arc::new(backend),
            Arc::new(CacheService::new(100)),
            GenerationConfig::default(),
        ))
    }

    fn text(body: &str) -> Json<TextRequest> {
        Json(TextRequest {
            text: body.to_string(),
        })
    }

    #[tokio::test]
    async fn test_grammar_handler_miss_then_hit() {
        let state = state_with(MockBackend::new());

        let first = grammar_handler(State(state.clone()), text("teh cat sat"))
            .await
            .unwrap();
        assert_eq!(first.text, "TEH CAT SAT");
        assert!(!first.from_cache);

        let second = grammar_handler(State(state.clone()), text("teh cat sat"))
            .await
            .unwrap();
        assert!(second.from_cache);
    }

    #[tokio::test]
    async fn test_grammar_handler_blank_text() {
        let state = state_with(MockBackend::new());

        let result = grammar_handler(State(state), text("   ")).await;
        assert!(matches!(result, Err(TypifyError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_summarize_handler() {
        let state = state_with(MockBackend::new());

        let resp = summarize_handler(State(state), text("a long story"))
            .await
            .unwrap();
        assert_eq!(resp.text, "A LONG STORY");
    }

    #[tokio::test]
    async fn test_tone_handler_default_tone() {
        let state = state_with(MockBackend::new());
        let req = ToneRequest {
            text: "hey there".to_string(),
            tone: None,
        };

        let resp = tone_handler(State(state), Json(req)).await.unwrap();
        assert_eq!(resp.target_tone.as_deref(), Some("formal"));
    }

    #[tokio::test]
    async fn test_tone_handler_unsupported_tone() {
        let state = state_with(MockBackend::new());
        let req = ToneRequest {
            text: "hey there".to_string(),
            tone: Some("pirate".to_string()),
        };

        let result = tone_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(TypifyError::UnsupportedTone(_))));
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let state = state_with(MockBackend::with_error(503));

        let result = grammar_handler(State(state.clone()), text("teh cat")).await;
        assert!(matches!(result, Err(TypifyError::Backend(_))));

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_stats_and_clear_handlers() {
        let state = state_with(MockBackend::new());
        grammar_handler(State(state.clone()), text("one")).await.unwrap();
        summarize_handler(State(state.clone()), text("two")).await.unwrap();

        let stats = stats_handler(State(state.clone())).await;
        assert_eq!(stats.stats.total_entries, 2);
        assert_eq!(stats.stats.capacity, 100);

        let cleared = clear_handler(State(state.clone())).await;
        assert_eq!(cleared.cleared, 2);

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_clear_handler_reports_removed_entries() {
        let state = state_with(MockBackend::new());

        let empty = clear_handler(State(state.clone())).await;
        assert_eq!(empty.cleared, 0);

        grammar_handler(State(state.clone()), text("one")).await.unwrap();
        let cleared = clear_handler(State(state.clone())).await;
        assert_eq!(cleared.cleared, 1);

        let again = clear_handler(State(state)).await;
        assert_eq!(again.cleared, 0);
    }

    #[tokio::test]
    async fn test_tone_handler_shares_cache_with_direct_calls() {
        let state = state_with(MockBackend::new());
        let req = ToneRequest {
            text: "hey there".to_string(),
            tone: Some("Formal".to_string()),
        };

        let resp = tone_handler(State(state.clone()), Json(req)).await.unwrap();
        assert!(!resp.from_cache);

        let direct = state
            .ops
            .change_tone("hey there", crate::text::Tone::Formal)
            .unwrap();
        assert!(direct.from_cache);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let healthy = health_handler(State(state_with(MockBackend::new()))).await;
        assert_eq!(healthy.status, "healthy");
        assert!(!healthy.cache_ready);

        let degraded = health_handler(State(state_with(MockBackend::unloaded()))).await;
        assert_eq!(degraded.status, "degraded");
        assert_eq!(degraded.backend, "mock");
    }
}
