//! Static, pre-graded results body.

use quizforge_core::evaluator::{classify_option, display_percent, evaluate};
use quizforge_core::model::{Quiz, QuizResult};

use crate::escape::escape;

/// Build the results body for a graded attempt.
///
/// The score shown is the one stored in `result`; per-option marks are
/// derived from the stored answers, so nothing here can disagree with the
/// evaluator.
pub fn build_results(quiz: &Quiz, result: &QuizResult) -> String {
    let mut html = String::new();
    let mut correct_count = 0;

    let mut questions = String::new();
    for (q_index, question) in quiz.questions.iter().enumerate() {
        let selected = result.answers.selected(q_index);
        let correct = evaluate(question, &selected);
        if correct {
            correct_count += 1;
        }
        let verdict = if correct { "correct" } else { "incorrect" };

        questions.push_str(&format!(
            "<div class=\"question {verdict}\" id=\"q{q_index}\" data-question=\"{q_index}\">\n"
        ));
        questions.push_str(&format!(
            "<h3>{}. {}</h3>\n",
            q_index + 1,
            escape(&question.text)
        ));
        questions.push_str(&format!(
            "<p class=\"type\">{}</p>\n",
            question.question_type.label()
        ));
        questions.push_str("<ul class=\"options\">\n");
        for (o_index, option) in question.options.iter().enumerate() {
            let mark = classify_option(option.is_correct, selected.contains(&o_index));
            let classes = match mark.css_classes() {
                "" => "option static".to_string(),
                extra => format!("option static {extra}"),
            };
            questions.push_str("<li>\n");
            questions.push_str(&format!(
                "<div class=\"{classes}\" data-option=\"{o_index}\">\n"
            ));
            questions.push_str("<div class=\"body\">\n");
            questions.push_str(&format!(
                "<span class=\"option-text\">{}</span> <span class=\"marker\">{}</span>\n",
                escape(&option.text),
                mark.symbol()
            ));
            questions.push_str(&format!(
                "<div class=\"explanation visible\">{}</div>\n",
                escape(&option.explanation)
            ));
            questions.push_str("</div>\n</div>\n</li>\n");
        }
        questions.push_str("</ul>\n</div>\n");
    }

    html.push_str(&format!("<h1>Results: {}</h1>\n", escape(&quiz.title)));
    html.push_str(&format!("<h2>Topic: {}</h2>\n", escape(&quiz.topic)));
    html.push_str("<div id=\"results-summary\">\n");
    html.push_str(&format!(
        "<h2>Final Score: <span class=\"score\">{}%</span></h2>\n",
        display_percent(result.score)
    ));
    html.push_str(&format!(
        "<p>{correct_count} of {} correct</p>\n",
        quiz.questions.len()
    ));
    html.push_str("</div>\n");
    html.push_str(&questions);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::evaluator::grade;
    use quizforge_core::model::{
        AnswerOption, AnswerState, ExamSettings, Question, QuestionSet, QuestionType,
    };

    fn quiz() -> Quiz {
        let question = |text: &str, question_type, correct: &[usize]| Question {
            text: text.into(),
            question_type,
            options: (0..3)
                .map(|i| AnswerOption {
                    text: format!("opt {i}"),
                    is_correct: correct.contains(&i),
                    explanation: format!("because {i}"),
                })
                .collect(),
        };
        Quiz::from_question_set(
            QuestionSet {
                title: "Results".into(),
                topic: "Testing".into(),
                questions: vec![
                    question("first", QuestionType::SingleSelect, &[0]),
                    question("second", QuestionType::MultiSelect, &[1, 2]),
                ],
            },
            ExamSettings::default(),
        )
    }

    #[test]
    fn marks_every_option_four_ways() {
        let quiz = quiz();
        let answers: AnswerState = "0:0;1:0,1".parse().unwrap();
        let result = grade(&quiz, answers);
        let body = build_results(&quiz, &result);

        assert!(body.contains("<div class=\"option static correct user-choice\" data-option=\"0\">"));
        assert!(body.contains("<div class=\"option static incorrect user-choice\" data-option=\"0\">"));
        assert!(body.contains("<div class=\"option static correct\" data-option=\"2\">"));
        assert!(body.contains("<div class=\"option static\" data-option=\"1\">"));
        assert!(body.contains("Final Score: <span class=\"score\">50%</span>"));
        assert!(body.contains("<p>1 of 2 correct</p>"));
    }

    #[test]
    fn all_explanations_visible_and_no_inputs() {
        let quiz = quiz();
        let result = grade(&quiz, AnswerState::new());
        let body = build_results(&quiz, &result);
        assert_eq!(body.matches("explanation visible").count(), 6);
        assert!(!body.contains("<input"));
        assert!(body.contains("0%</span>"));
    }
}
