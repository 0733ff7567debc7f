//! Error types shared across quizforge.
//!
//! `ProviderError` lives here so callers can downcast and classify generator
//! failures for retry decisions without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to a quiz generation service.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service answered, but not with a usable question set.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Errors from a key-value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON for key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store key: '{0}'")]
    InvalidKey(String),

    /// The backend refused the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A violated question-set invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question set has no questions")]
    NoQuestions,

    #[error("question {question} has no options")]
    NoOptions { question: usize },

    #[error("question {question} has no correct option")]
    NoCorrectOption { question: usize },

    #[error("single-select question {question} has {count} correct options")]
    AmbiguousSingleSelect { question: usize, count: usize },

    #[error("invalid generation request: {0}")]
    InvalidRequest(String),
}
