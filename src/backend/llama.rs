//! llama.cpp Server Backend
//!
//! Talks to a locally running llama.cpp HTTP server over its `/completion`
//! and `/health` endpoints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{BackendError, GenerationParams, InferenceBackend};
use crate::config::Config;

// == Wire Types ==
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: usize,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
    stop: &'a [String],
    stream: bool,
}

impl<'a> CompletionRequest<'a> {
    fn new(prompt: &'a str, params: &'a GenerationParams) -> Self {
        Self {
            prompt,
            n_predict: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            repeat_penalty: params.repeat_penalty,
            stop: &params.stop,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
}

// == Llama Server Backend ==
/// Blocking client for a llama.cpp server.
///
/// The backend counts as loaded only after a successful `probe`. Build and
/// drop it outside of an async context; call `generate` from a blocking
/// thread.
#[derive(Debug)]
pub struct LlamaServerBackend {
    client: Client,
    base_url: String,
    loaded: AtomicBool,
}

impl LlamaServerBackend {
    // == Constructor ==
    /// Creates a backend for the server at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            loaded: AtomicBool::new(false),
        })
    }

    /// Creates a backend from `BACKEND_URL` and `BACKEND_TIMEOUT`.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Self::new(
            config.backend_url.clone(),
            Duration::from_secs(config.backend_timeout),
        )
    }

    // == Probe ==
    /// Checks the server's health endpoint and records whether it is ready.
    pub fn probe(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        let ready = match self.client.get(&url).send() {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!(status = %response.status(), "Inference server is not ready");
                false
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Inference server unreachable");
                false
            }
        };

        self.loaded.store(ready, Ordering::Release);
        if ready {
            info!(url = %self.base_url, "Inference server ready");
        }
        ready
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl InferenceBackend for LlamaServerBackend {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, BackendError> {
        let url = format!("{}/completion", self.base_url);
        debug!(max_tokens = params.max_tokens, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .json(&CompletionRequest::new(prompt, params))
            .send()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body: CompletionResponse = response
            .json()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(body.content)
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    fn name(&self) -> &str {
        "llama.cpp"
    }
}
