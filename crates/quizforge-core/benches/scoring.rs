use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::evaluator::{outcomes, score};
use quizforge_core::model::{
    AnswerOption, AnswerState, ExamSettings, Question, QuestionSet, QuestionType, Quiz,
};

fn make_quiz(questions: usize) -> Quiz {
    Quiz::from_question_set(
        QuestionSet {
            title: "bench".into(),
            topic: "bench".into(),
            questions: (0..questions)
                .map(|i| Question {
                    text: format!("question {i}"),
                    question_type: if i % 2 == 0 {
                        QuestionType::SingleSelect
                    } else {
                        QuestionType::MultiSelect
                    },
                    options: (0..5)
                        .map(|o| AnswerOption {
                            text: format!("option {o}"),
                            is_correct: o == 0 || (i % 2 == 1 && o == 3),
                            explanation: String::new(),
                        })
                        .collect(),
                })
                .collect(),
        },
        ExamSettings::default(),
    )
}

fn make_answers(questions: usize) -> AnswerState {
    let mut answers = AnswerState::new();
    for i in 0..questions {
        answers.set(i, [0, i % 4]);
    }
    answers
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    for n in [5, 25, 250] {
        let quiz = make_quiz(n);
        let answers = make_answers(n);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| score(black_box(&quiz), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_outcomes(c: &mut Criterion) {
    let quiz = make_quiz(25);
    let answers = make_answers(25);
    c.bench_function("outcomes/questions=25", |b| {
        b.iter(|| outcomes(black_box(&quiz), black_box(&answers)))
    });
}

criterion_group!(benches, bench_score, bench_outcomes);
criterion_main!(benches);
