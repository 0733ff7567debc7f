//! Core data model types for quizforge.
//!
//! These are the types every other crate uses to represent quizzes,
//! questions, answer state, and graded results.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a question accepts answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Exactly one option may be selected (radio group).
    #[serde(rename = "SINGLE_SELECT", alias = "MULTIPLE_CHOICE")]
    SingleSelect,
    /// Any number of options may be selected (checkboxes).
    #[serde(rename = "MULTI_SELECT", alias = "MULTIPLE_SELECT")]
    MultiSelect,
}

impl QuestionType {
    /// Wire name, as embedded in exported artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleSelect => "SINGLE_SELECT",
            QuestionType::MultiSelect => "MULTI_SELECT",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::SingleSelect => "Single select",
            QuestionType::MultiSelect => "Multi select",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single_select" | "multiple_choice" => Ok(QuestionType::SingleSelect),
            "multi" | "multi_select" | "multiple_select" => Ok(QuestionType::MultiSelect),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option text (may contain Markdown).
    pub text: String,
    /// Whether selecting this option is part of the correct answer.
    pub is_correct: bool,
    /// Why this option is correct or incorrect.
    #[serde(default)]
    pub explanation: String,
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question text (may contain Markdown).
    pub text: String,
    /// Single or multi select.
    pub question_type: QuestionType,
    /// Ordered answer options.
    pub options: Vec<AnswerOption>,
}

/// Exam settings fixed at quiz creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExamSettings {
    /// Countdown in minutes; 0 disables the timer.
    #[serde(default)]
    pub timer_minutes: u32,
    /// Whether the hint assistant may be used during an attempt.
    #[serde(default)]
    pub assistant_enabled: bool,
}

/// The output of a quiz generator, before it becomes a library entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub title: String,
    pub topic: String,
    pub questions: Vec<Question>,
}

/// A persisted quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier.
    pub id: String,
    pub title: String,
    pub topic: String,
    /// Ordered, non-empty question list.
    pub questions: Vec<Question>,
    #[serde(default)]
    pub settings: ExamSettings,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// Stamp a generated question set with a fresh id and creation time.
    pub fn from_question_set(set: QuestionSet, settings: ExamSettings) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: set.title,
            topic: set.topic,
            questions: set.questions,
            settings,
            created_at: Utc::now(),
        }
    }
}

/// Selected option indices per question index for one attempt.
///
/// Question indices absent from the map are the empty selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerState(BTreeMap<usize, BTreeSet<usize>>);

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected options for a question (empty if unanswered).
    pub fn selected(&self, question: usize) -> BTreeSet<usize> {
        self.0.get(&question).cloned().unwrap_or_default()
    }

    /// Whether a given option is currently selected.
    pub fn is_selected(&self, question: usize, option: usize) -> bool {
        self.0.get(&question).is_some_and(|s| s.contains(&option))
    }

    /// Replace the selection of a question.
    pub fn set(&mut self, question: usize, options: impl IntoIterator<Item = usize>) {
        self.0.insert(question, options.into_iter().collect());
    }

    /// Apply one user toggle following the question type's input semantics.
    ///
    /// Single select replaces the selection; multi select flips the option.
    pub fn toggle(&mut self, question: usize, option: usize, question_type: QuestionType) {
        let entry = self.0.entry(question).or_default();
        match question_type {
            QuestionType::SingleSelect => {
                entry.clear();
                entry.insert(option);
            }
            QuestionType::MultiSelect => {
                if !entry.remove(&option) {
                    entry.insert(option);
                }
            }
        }
    }

    /// Number of questions with a non-empty selection.
    pub fn answered_count(&self) -> usize {
        self.0.values().filter(|s| !s.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &BTreeSet<usize>)> {
        self.0.iter()
    }
}

/// Parses `"0:1;1:0,2"`: question index, colon, comma-separated options.
impl FromStr for AnswerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut answers = AnswerState::new();
        for entry in s.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (question, options) = entry
                .split_once(':')
                .ok_or_else(|| format!("expected `question:options`, got '{entry}'"))?;
            let question: usize = question
                .trim()
                .parse()
                .map_err(|_| format!("invalid question index: '{}'", question.trim()))?;
            let options = options
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(|o| {
                    o.parse::<usize>()
                        .map_err(|_| format!("invalid option index: '{o}'"))
                })
                .collect::<Result<BTreeSet<_>, _>>()?;
            answers.set(question, options);
        }
        Ok(answers)
    }
}

/// A graded attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub answers: AnswerState,
    /// Percentage in `[0, 100]`.
    pub score: f64,
}
