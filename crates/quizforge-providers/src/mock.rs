//! Mock provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizforge_core::error::ProviderError;
use quizforge_core::model::{AnswerOption, Question, QuestionSet, QuestionType};
use quizforge_core::traits::{GenerationRequest, HintProvider, QuizGenerator};

const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// An offline generator and hint assistant.
///
/// By default it writes a deterministic quiz shaped by the request. It can be
/// told to fail a number of calls first, to return a fixed question set, or
/// to fail every call.
pub struct MockProvider {
    fixed: Option<QuestionSet>,
    hint: String,
    /// Calls left that fail before generation starts succeeding.
    failures_left: AtomicU32,
    always_fail: bool,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            fixed: None,
            hint: "Think about what each option guarantees, then rule out the ones that overpromise."
                .to_string(),
            failures_left: AtomicU32::new(0),
            always_fail: false,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always return `set`, whatever was requested.
    pub fn with_question_set(set: QuestionSet) -> Self {
        Self {
            fixed: Some(set),
            ..Self::new()
        }
    }

    /// Fail the next `n` generation calls with a transient network error.
    pub fn failing_first(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::Relaxed);
        self
    }

    /// Fail every generation call.
    pub fn always_failing() -> Self {
        Self {
            always_fail: true,
            ..Self::new()
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Number of generation calls made, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

/// The quiz the mock writes for a request: question types cycle through the
/// requested set, single-select questions have one correct option and
/// multi-select questions two.
fn synthetic_question_set(request: &GenerationRequest) -> QuestionSet {
    let types: Vec<QuestionType> = request.types.iter().copied().collect();
    let questions = (0..request.count as usize)
        .map(|i| {
            let question_type = types[i % types.len()];
            let correct: &[usize] = match question_type {
                QuestionType::SingleSelect => &[0],
                QuestionType::MultiSelect => &[0, 2],
            };
            Question {
                text: format!("Question {} about {}?", i + 1, request.topic),
                question_type,
                options: LETTERS
                    .iter()
                    .enumerate()
                    .map(|(o, letter)| {
                        let is_correct = correct.contains(&o);
                        AnswerOption {
                            text: format!("Option {letter}"),
                            is_correct,
                            explanation: if is_correct {
                                format!("Option {letter} is correct.")
                            } else {
                                format!("Option {letter} is incorrect.")
                            },
                        }
                    })
                    .collect(),
            }
        })
        .collect();

    QuestionSet {
        title: format!("{} Quiz", request.topic),
        topic: request.topic.clone(),
        questions,
    }
}

#[async_trait]
impl QuizGenerator for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<QuestionSet> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if self.always_fail {
            return Err(ProviderError::ApiError {
                status: 503,
                message: "mock generation failure".into(),
            }
            .into());
        }
        let pending = self.failures_left.load(Ordering::Relaxed);
        if pending > 0 {
            self.failures_left.store(pending - 1, Ordering::Relaxed);
            return Err(ProviderError::NetworkError("mock transient failure".into()).into());
        }

        Ok(match &self.fixed {
            Some(set) => set.clone(),
            None => synthetic_question_set(request),
        })
    }
}

#[async_trait]
impl HintProvider for MockProvider {
    async fn hint(&self, _question: &Question, _user_text: &str) -> String {
        self.hint.clone()
    }
}
