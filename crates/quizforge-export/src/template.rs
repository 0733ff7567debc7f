//! Interactive template body and its data island.

use serde::Serialize;

use quizforge_core::model::{QuestionType, Quiz};

use crate::escape::escape;

/// Per-question grading data carried in the island.
///
/// Option text is deliberately absent; the script only needs correctness
/// and explanations, aligned by index with the markup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IslandQuestion<'a> {
    question_type: &'static str,
    options: Vec<IslandOption<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IslandOption<'a> {
    is_correct: bool,
    explanation: &'a str,
}

/// Build the template body and the serialized island for `quiz`.
pub fn build_template(quiz: &Quiz) -> (String, String) {
    (template_body(quiz), island_json(quiz))
}

fn template_body(quiz: &Quiz) -> String {
    let mut html = String::new();

    html.push_str(&format!("<h1>{}</h1>\n", escape(&quiz.title)));
    html.push_str(&format!("<h2>Topic: {}</h2>\n", escape(&quiz.topic)));

    for (q_index, question) in quiz.questions.iter().enumerate() {
        let input_type = match question.question_type {
            QuestionType::SingleSelect => "radio",
            QuestionType::MultiSelect => "checkbox",
        };

        html.push_str(&format!(
            "<div class=\"question\" id=\"q{q_index}\" data-question=\"{q_index}\">\n"
        ));
        html.push_str(&format!(
            "<h3>{}. {}</h3>\n",
            q_index + 1,
            escape(&question.text)
        ));
        html.push_str(&format!(
            "<p class=\"type\">{}</p>\n",
            question.question_type.label()
        ));
        html.push_str("<ul class=\"options\">\n");
        for (o_index, option) in question.options.iter().enumerate() {
            html.push_str("<li>\n");
            html.push_str(&format!(
                "<label class=\"option\" data-option=\"{o_index}\">\n"
            ));
            html.push_str(&format!(
                "<input type=\"{input_type}\" name=\"q{q_index}\" value=\"{o_index}\">\n"
            ));
            html.push_str("<div class=\"body\">\n");
            html.push_str(&format!(
                "<span class=\"option-text\">{}</span> <span class=\"marker\"></span>\n",
                escape(&option.text)
            ));
            html.push_str(&format!(
                "<div class=\"explanation\">{}</div>\n",
                escape(&option.explanation)
            ));
            html.push_str("</div>\n</label>\n</li>\n");
        }
        html.push_str("</ul>\n</div>\n");
    }

    html.push_str("<div id=\"results-summary\" class=\"hidden\"></div>\n");
    html.push_str("<div class=\"actions\">\n");
    html.push_str("<button id=\"check-answers-btn\" class=\"button\">Check Answers</button>\n");
    html.push_str("<button id=\"reset-btn\" class=\"button secondary hidden\">Reset Quiz</button>\n");
    html.push_str("</div>\n");
    html
}

fn island_json(quiz: &Quiz) -> String {
    let island: Vec<IslandQuestion<'_>> = quiz
        .questions
        .iter()
        .map(|q| IslandQuestion {
            question_type: q.question_type.as_str(),
            options: q
                .options
                .iter()
                .map(|o| IslandOption {
                    is_correct: o.is_correct,
                    explanation: &o.explanation,
                })
                .collect(),
        })
        .collect();

    match serde_json::to_string(&island) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(quiz = %quiz.id, "failed to serialize quiz data: {e}");
            "[]".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::model::{AnswerOption, ExamSettings, Question, QuestionSet};

    fn quiz() -> Quiz {
        Quiz::from_question_set(
            QuestionSet {
                title: "Rust & You".into(),
                topic: "Ownership".into(),
                questions: vec![
                    Question {
                        text: "Which moves?".into(),
                        question_type: QuestionType::SingleSelect,
                        options: vec![
                            AnswerOption {
                                text: "String".into(),
                                is_correct: true,
                                explanation: "Not Copy".into(),
                            },
                            AnswerOption {
                                text: "u32".into(),
                                is_correct: false,
                                explanation: "Copy".into(),
                            },
                        ],
                    },
                    Question {
                        text: "Pick the <smart> pointers".into(),
                        question_type: QuestionType::MultiSelect,
                        options: vec![
                            AnswerOption {
                                text: "Box".into(),
                                is_correct: true,
                                explanation: String::new(),
                            },
                            AnswerOption {
                                text: "Rc".into(),
                                is_correct: true,
                                explanation: String::new(),
                            },
                            AnswerOption {
                                text: "i64".into(),
                                is_correct: false,
                                explanation: String::new(),
                            },
                        ],
                    },
                ],
            },
            ExamSettings::default(),
        )
    }

    #[test]
    fn markup_uses_radio_for_single_and_checkbox_for_multi() {
        let (body, _) = build_template(&quiz());
        assert_eq!(body.matches("type=\"radio\" name=\"q0\"").count(), 2);
        assert_eq!(body.matches("type=\"checkbox\" name=\"q1\"").count(), 3);
        assert!(body.contains("<h1>Rust &amp; You</h1>"));
        assert!(body.contains("Pick the &lt;smart&gt; pointers"));
        assert!(body.contains("<div id=\"results-summary\" class=\"hidden\"></div>"));
        assert!(body.contains("id=\"reset-btn\" class=\"button secondary hidden\""));
    }

    #[test]
    fn explanations_start_hidden() {
        let (body, _) = build_template(&quiz());
        assert_eq!(body.matches("<div class=\"explanation\">").count(), 5);
        assert!(!body.contains("explanation visible"));
    }

    #[test]
    fn island_carries_grading_data_only() {
        let (_, json) = build_template(&quiz());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let questions = value.as_array().unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0]["questionType"], "SINGLE_SELECT");
        assert_eq!(questions[1]["options"][1]["isCorrect"], true);
        assert_eq!(questions[0]["options"][1]["explanation"], "Copy");
        assert!(!json.contains("optionText"));
        assert!(!json.contains("String"));
    }
}
