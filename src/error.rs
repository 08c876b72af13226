//! Error types for the text assistant
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

// == Typify Error Enum ==
/// Unified error type for text operations and the control surface.
///
/// Cache operations never fail; a miss is a normal `None`. Everything here
/// belongs to configuration, input validation or the inference backend.
#[derive(Error, Debug)]
pub enum TypifyError {
    /// Configuration value rejected at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input text was empty or otherwise unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested tone has no prompt template
    #[error("Unsupported tone: {0}")]
    UnsupportedTone(String),

    /// Inference backend has not been loaded
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Inference backend call failed
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Model output failed validation
    #[error("Invalid response from model: {0}")]
    InvalidResponse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TypifyError {
    /// HTTP status used when this error reaches the control surface.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TypifyError::Config(_) | TypifyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TypifyError::InvalidInput(_) | TypifyError::UnsupportedTone(_) => {
                StatusCode::BAD_REQUEST
            }
            TypifyError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TypifyError::Backend(_) | TypifyError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for TypifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the text assistant.
pub type Result<T> = std::result::Result<T, TypifyError>;
