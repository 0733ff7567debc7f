//! Collaborator trait definitions.
//!
//! Generation and hints are implemented by `quizforge-providers`; key-value
//! stores live in [`crate::store`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StoreError, ValidationError};
use crate::model::{Question, QuestionSet, QuestionType};

// ---------------------------------------------------------------------------
// Quiz generation
// ---------------------------------------------------------------------------

/// Smallest number of questions a generator may be asked for.
pub const MIN_QUESTIONS: u32 = 1;
/// Largest number of questions a generator may be asked for.
pub const MAX_QUESTIONS: u32 = 25;

/// Trait for AI backends that write a quiz about a topic.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a question set. Implementations only return sets that pass
    /// [`crate::parser::ensure_well_formed`].
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<QuestionSet>;
}

/// Request to generate a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    /// Number of questions, within `MIN_QUESTIONS..=MAX_QUESTIONS`.
    pub count: u32,
    /// Question types to mix; never empty.
    pub types: BTreeSet<QuestionType>,
}

impl GenerationRequest {
    pub fn new(
        topic: impl Into<String>,
        count: u32,
        types: impl IntoIterator<Item = QuestionType>,
    ) -> Result<Self, ValidationError> {
        let topic = topic.into();
        let types: BTreeSet<_> = types.into_iter().collect();
        if topic.trim().is_empty() {
            return Err(ValidationError::InvalidRequest("topic is empty".into()));
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&count) {
            return Err(ValidationError::InvalidRequest(format!(
                "question count must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {count}"
            )));
        }
        if types.is_empty() {
            return Err(ValidationError::InvalidRequest(
                "at least one question type is required".into(),
            ));
        }
        Ok(Self {
            topic: topic.trim().to_string(),
            count,
            types,
        })
    }
}

// ---------------------------------------------------------------------------
// Hint assistant
// ---------------------------------------------------------------------------

/// Fixed reply used when a hint cannot be produced.
pub const HINT_APOLOGY: &str = "I'm sorry, I'm having trouble coming up with a hint right now. Please try asking in a different way.";

/// Trait for assistants that give hints without revealing answers.
#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Always returns text; internal failures map to [`HINT_APOLOGY`].
    async fn hint(&self, question: &Question, user_text: &str) -> String;
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// A JSON key-value store with load/save semantics.
pub trait KeyValueStore: Send + Sync {
    /// Load a value; `Ok(None)` when the key was never saved.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Save a value, replacing any previous one.
    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Move the stored value of `key` out of the way so the next `save`
    /// cannot destroy it. Returns where it went, or `None` when nothing was
    /// stored.
    fn backup(&self, key: &str) -> Result<Option<String>, StoreError>;
}
