//! Request DTOs for the control surface
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::error::{Result, TypifyError};
use crate::text::Tone;

/// Request body for POST /grammar and POST /summarize
#[derive(Debug, Clone, Deserialize)]
pub struct TextRequest {
    /// Text captured from the clipboard or selection
    pub text: String,
}

/// Request body for POST /tone
///
/// # Fields
/// - `text`: Text to rewrite
/// - `tone`: Target tone (defaults to "formal")
#[derive(Debug, Clone, Deserialize)]
pub struct ToneRequest {
    pub text: String,
    #[serde(default)]
    pub tone: Option<String>,
}

impl ToneRequest {
    /// Resolves the requested tone, rejecting tones without a prompt.
    pub fn tone(&self) -> Result<Tone> {
        match &self.tone {
            Some(raw) => raw.parse(),
            None => Ok(Tone::default()),
        }
    }
}

impl TextRequest {
    /// Validates the request data
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(TypifyError::InvalidInput("text cannot be empty".to_string()));
        }
        Ok(())
    }
}
