//! quizforge-providers — AI backends for quiz generation and hints.
//!
//! Implements the `QuizGenerator` and `HintProvider` traits for Google
//! Gemini and for an offline mock, plus configuration loading and retries.

pub mod config;
pub mod gemini;
pub mod mock;
pub mod retry;

pub use config::{create_provider, load_config, load_config_from, Provider, ProviderConfig, QuizforgeConfig};
pub use quizforge_core::error::ProviderError;
pub use retry::{generate_with_retry, RetryPolicy};
