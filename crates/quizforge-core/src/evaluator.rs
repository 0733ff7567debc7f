//! Canonical answer evaluation and scoring.
//!
//! Exported artifacts carry a second implementation of this algorithm in
//! their embedded script. Both must agree on every input: a question is
//! correct only when the selection equals the set of correct options, and
//! the score is `(correct / total) * 100` computed in that order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerState, Question, Quiz, QuizResult};

/// Indices of the options marked correct.
pub fn correct_indices(question: &Question) -> BTreeSet<usize> {
    question
        .options
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_correct)
        .map(|(i, _)| i)
        .collect()
}

/// Whether a selection answers the question correctly.
///
/// Exact set equality: no partial credit for multi-select subsets.
pub fn evaluate(question: &Question, selected: &BTreeSet<usize>) -> bool {
    let correct = correct_indices(question);
    debug_assert!(
        !correct.is_empty(),
        "question without a correct option: {:?}",
        question.text
    );
    correct.len() == selected.len() && correct.is_subset(selected)
}

/// Number of questions answered correctly.
pub fn correct_count(quiz: &Quiz, answers: &AnswerState) -> usize {
    quiz.questions
        .iter()
        .enumerate()
        .filter(|(i, q)| evaluate(q, &answers.selected(*i)))
        .count()
}

/// Percentage of correctly answered questions.
pub fn score(quiz: &Quiz, answers: &AnswerState) -> f64 {
    let total = quiz.questions.len();
    if total == 0 {
        return 0.0;
    }
    correct_count(quiz, answers) as f64 / total as f64 * 100.0
}

/// Grade an attempt.
pub fn grade(quiz: &Quiz, answers: AnswerState) -> QuizResult {
    let score = score(quiz, &answers);
    QuizResult { answers, score }
}

/// Whole-percent display value, rounding halves away from zero.
pub fn display_percent(score: f64) -> u32 {
    score.round().clamp(0.0, 100.0) as u32
}

/// Per-question breakdown of a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub correct: bool,
    pub selected: BTreeSet<usize>,
    pub correct_indices: BTreeSet<usize>,
}

/// Outcomes for every question of the quiz, index-aligned.
pub fn outcomes(quiz: &Quiz, answers: &AnswerState) -> Vec<QuestionOutcome> {
    quiz.questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let selected = answers.selected(i);
            QuestionOutcome {
                correct: evaluate(q, &selected),
                correct_indices: correct_indices(q),
                selected,
            }
        })
        .collect()
}

/// How a single option is shown once an attempt is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionMark {
    CorrectSelected,
    CorrectMissed,
    IncorrectSelected,
    Neutral,
}

impl OptionMark {
    /// CSS classes added to the option element, in addition to `option`.
    pub fn css_classes(&self) -> &'static str {
        match self {
            OptionMark::CorrectSelected => "correct user-choice",
            OptionMark::CorrectMissed => "correct",
            OptionMark::IncorrectSelected => "incorrect user-choice",
            OptionMark::Neutral => "",
        }
    }

    /// Correctness marker shown next to the option.
    pub fn symbol(&self) -> &'static str {
        match self {
            OptionMark::CorrectSelected | OptionMark::CorrectMissed => "\u{2713}",
            OptionMark::IncorrectSelected => "\u{2717}",
            OptionMark::Neutral => "",
        }
    }
}

/// Four-way classification of an option.
pub fn classify_option(is_correct: bool, is_selected: bool) -> OptionMark {
    match (is_correct, is_selected) {
        (true, true) => OptionMark::CorrectSelected,
        (true, false) => OptionMark::CorrectMissed,
        (false, true) => OptionMark::IncorrectSelected,
        (false, false) => OptionMark::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, ExamSettings, QuestionType};

    fn question(question_type: QuestionType, correct: &[usize], n: usize) -> Question {
        Question {
            text: "q".into(),
            question_type,
            options: (0..n)
                .map(|i| AnswerOption {
                    text: format!("option {i}"),
                    is_correct: correct.contains(&i),
                    explanation: String::new(),
                })
                .collect(),
        }
    }

    fn quiz(questions: Vec<Question>) -> Quiz {
        Quiz {
            id: "quiz-1".into(),
            title: "Quiz".into(),
            topic: "Topic".into(),
            questions,
            settings: ExamSettings::default(),
            created_at: chrono::DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn single_select_exact_match() {
        let q = question(QuestionType::SingleSelect, &[2], 4);
        assert!(evaluate(&q, &set(&[2])));
        assert!(!evaluate(&q, &set(&[1])));
        assert!(!evaluate(&q, &set(&[2, 3])));
    }

    #[test]
    fn multi_select_set_equality() {
        let q = question(QuestionType::MultiSelect, &[0, 2], 4);
        assert!(evaluate(&q, &set(&[0, 2])));
        assert!(!evaluate(&q, &set(&[0])));
        assert!(!evaluate(&q, &set(&[0, 1, 2])));
    }

    #[test]
    fn score_three_of_four() {
        let quiz = quiz(vec![
            question(QuestionType::SingleSelect, &[0], 3),
            question(QuestionType::SingleSelect, &[1], 3),
            question(QuestionType::MultiSelect, &[0, 1], 3),
            question(QuestionType::SingleSelect, &[2], 3),
        ]);
        let answers: AnswerState = "0:0;1:1;2:0,1;3:0".parse().unwrap();
        assert_eq!(score(&quiz, &answers), 75.0);
        assert_eq!(correct_count(&quiz, &answers), 3);
    }

    #[test]
    fn missing_answer_is_incorrect() {
        let quiz = quiz(vec![
            question(QuestionType::SingleSelect, &[0], 2),
            question(QuestionType::MultiSelect, &[0, 1], 2),
        ]);
        let answers: AnswerState = "0:0".parse().unwrap();
        let outcomes = outcomes(&quiz, &answers);
        assert!(outcomes[0].correct);
        assert!(!outcomes[1].correct);
        assert!(outcomes[1].selected.is_empty());
        assert_eq!(score(&quiz, &AnswerState::new()), 0.0);
    }

    #[test]
    fn grade_keeps_answers() {
        let quiz = quiz(vec![question(QuestionType::SingleSelect, &[1], 2)]);
        let answers: AnswerState = "0:1".parse().unwrap();
        let result = grade(&quiz, answers.clone());
        assert_eq!(result.score, 100.0);
        assert_eq!(result.answers, answers);
    }

    #[test]
    fn display_rounds_half_up() {
        assert_eq!(display_percent(62.5), 63);
        assert_eq!(display_percent(100.0 / 3.0), 33);
        assert_eq!(display_percent(200.0 / 3.0), 67);
        assert_eq!(display_percent(100.0), 100);
    }

    #[test]
    fn option_classification() {
        assert_eq!(classify_option(true, true), OptionMark::CorrectSelected);
        assert_eq!(classify_option(true, false), OptionMark::CorrectMissed);
        assert_eq!(classify_option(false, true), OptionMark::IncorrectSelected);
        assert_eq!(classify_option(false, false), OptionMark::Neutral);
        assert_eq!(OptionMark::IncorrectSelected.css_classes(), "incorrect user-choice");
        assert!(OptionMark::Neutral.symbol().is_empty());
    }
}
