//! Question-set JSON parser.
//!
//! Reads the JSON shape produced by quiz generators (and accepted by
//! `quizforge import`), and checks question-set invariants.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ValidationError;
use crate::model::{AnswerOption, Question, QuestionSet, QuestionType};

/// Intermediate structure matching the generator wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestionSet {
    title: String,
    topic: String,
    #[serde(default)]
    questions: Vec<WireQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    question_text: String,
    question_type: QuestionType,
    #[serde(default)]
    options: Vec<WireOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOption {
    option_text: String,
    is_correct: bool,
    #[serde(default)]
    explanation: String,
}

/// Parse a question set from a JSON file.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content)
        .with_context(|| format!("failed to parse question set: {}", path.display()))
}

/// Parse a question set from a JSON string.
pub fn parse_question_set_str(content: &str) -> Result<QuestionSet> {
    let parsed: WireQuestionSet =
        serde_json::from_str(content.trim()).context("malformed question set JSON")?;

    Ok(QuestionSet {
        title: parsed.title,
        topic: parsed.topic,
        questions: parsed
            .questions
            .into_iter()
            .map(|q| Question {
                text: q.question_text,
                question_type: q.question_type,
                options: q
                    .options
                    .into_iter()
                    .map(|o| AnswerOption {
                        text: o.option_text,
                        is_correct: o.is_correct,
                        explanation: o.explanation,
                    })
                    .collect(),
            })
            .collect(),
    })
}

/// Check the hard invariants: at least one question, every question has
/// options and at least one correct option, single-select has exactly one.
pub fn ensure_well_formed(questions: &[Question]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }
    for (i, q) in questions.iter().enumerate() {
        if q.options.is_empty() {
            return Err(ValidationError::NoOptions { question: i });
        }
        let correct = q.options.iter().filter(|o| o.is_correct).count();
        if correct == 0 {
            return Err(ValidationError::NoCorrectOption { question: i });
        }
        if q.question_type == QuestionType::SingleSelect && correct > 1 {
            return Err(ValidationError::AmbiguousSingleSelect {
                question: i,
                count: correct,
            });
        }
    }
    Ok(())
}

/// A soft issue found in a question set.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question index (if applicable).
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Look for issues that do not break grading but degrade a quiz.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.title.trim().is_empty() {
        warnings.push(ValidationWarning {
            question: None,
            message: "title is empty".into(),
        });
    }

    for (i, q) in set.questions.iter().enumerate() {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question: Some(i),
                message: "question text is empty".into(),
            });
        }

        if q.options.len() < 2 {
            warnings.push(ValidationWarning {
                question: Some(i),
                message: format!("only {} option(s)", q.options.len()),
            });
        }

        // Duplicate option text makes the rendered choices ambiguous
        let mut seen = HashSet::new();
        for option in &q.options {
            if !seen.insert(option.text.trim()) {
                warnings.push(ValidationWarning {
                    question: Some(i),
                    message: format!("duplicate option text: {}", option.text.trim()),
                });
            }
        }

        if q.options.iter().any(|o| o.explanation.trim().is_empty()) {
            warnings.push(ValidationWarning {
                question: Some(i),
                message: "option without explanation".into(),
            });
        }
    }

    warnings
}
