//! Inference Backend Module
//!
//! Capability interface for the language model and its production adapter.

mod llama;

use serde::Serialize;
use thiserror::Error;

pub use llama::LlamaServerBackend;

// == Backend Error ==
/// Failure reported by an inference backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Request could not be sent or timed out
    #[error("request failed: {0}")]
    Request(String),

    /// Server answered with a non-success status
    #[error("server returned status {0}")]
    Status(u16),

    /// Response body could not be decoded
    #[error("could not decode response: {0}")]
    Decode(String),
}

// == Generation Params ==
/// Sampling settings for a single generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
    pub stop: Vec<String>,
}

// == Inference Backend ==
/// Anything that can turn a prompt into text.
///
/// Calls are synchronous and may take seconds. Callers must not hold a
/// cache lock while calling `generate`.
pub trait InferenceBackend: Send + Sync {
    /// Runs the model on `prompt`.
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, BackendError>;

    /// Whether the model is ready to serve requests.
    fn is_loaded(&self) -> bool;

    /// Short name for logs and health output.
    fn name(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend double that echoes the text segment of the prompt, upper-cased.
    #[derive(Debug, Default)]
    pub struct MockBackend {
        unloaded: bool,
        error: Option<u16>,
        calls: AtomicUsize,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn unloaded() -> Self {
            Self {
                unloaded: true,
                ..Self::default()
            }
        }

        pub fn with_error(status: u16) -> Self {
            Self {
                error: Some(status),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl InferenceBackend for MockBackend {
        fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.error {
                return Err(BackendError::Status(status));
            }

            let text = prompt
                .rsplit_once(": ")
                .map(|(_, rest)| rest.trim_end_matches("[/INST]").trim())
                .unwrap_or(prompt);
            Ok(text.to_uppercase())
        }

        fn is_loaded(&self) -> bool {
            !self.unloaded
        }

        fn name(&self) -> &str {
            "mock"
        }
    }
}
