//! The `quizforge take` command.
//!
//! Interactive attempts read one command per line from stdin while the
//! quiz countdown (if any) runs beside the reader. Expiry takes the same
//! submit path as a manual submit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use quizforge_core::evaluator::{classify_option, display_percent, outcomes};
use quizforge_core::exam::{format_clock, Countdown, CountdownEvent, ExamSession};
use quizforge_core::model::{AnswerState, QuestionType, Quiz, QuizResult};
use quizforge_export::{export_results, write_artifact, ExportOptions};
use quizforge_providers::Provider;

use super::{find_quiz, Env, Workspace};

pub async fn execute(
    env: &Env,
    id: String,
    answers: Option<String>,
    export: Option<PathBuf>,
    provider: Option<String>,
) -> Result<()> {
    let workspace = Workspace::open(env)?;
    let library = workspace.library();
    let quiz = find_quiz(&library, &id)?;
    let mut session = ExamSession::new(quiz);

    let result = match answers {
        Some(raw) => {
            let answers: AnswerState = raw
                .parse()
                .map_err(anyhow::Error::msg)
                .context("invalid --answers")?;
            apply_answers(&mut session, &answers)?;
            session.submit()
        }
        None => run_interactive(&workspace, &mut session, provider.as_deref()).await?,
    };

    let Some(result) = result else {
        println!("Attempt abandoned, nothing was graded.");
        return Ok(());
    };

    print_result(quiz, &result);

    if let Some(dir) = export {
        let options = ExportOptions::from(workspace.preferences().settings());
        let path = write_artifact(&export_results(quiz, &result, &options), &dir)?;
        println!("Exported results to {}", path.display());
    }
    Ok(())
}

/// Replay scripted answers through the session so they obey the same input
/// rules as interactive toggles.
fn apply_answers(session: &mut ExamSession<'_>, answers: &AnswerState) -> Result<()> {
    let total = session.quiz().questions.len();
    for (&question, options) in answers.iter() {
        anyhow::ensure!(
            session.go_to(question),
            "question index {question} is out of range (quiz has {total})"
        );
        if session.current_question().question_type == QuestionType::SingleSelect {
            anyhow::ensure!(
                options.len() <= 1,
                "question index {question} is single select; choose one option"
            );
        }
        for &option in options {
            anyhow::ensure!(
                session.toggle(option),
                "question index {question} has no option index {option}"
            );
        }
    }
    Ok(())
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// 1-based option numbers to toggle.
    Toggle(Vec<usize>),
    Next,
    Previous,
    /// 1-based question number.
    GoTo(usize),
    Hint(String),
    Submit,
    Quit,
    Help,
    Show,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word.to_lowercase().as_str() {
        "" => Input::Show,
        "n" | "next" => Input::Next,
        "p" | "prev" | "previous" => Input::Previous,
        "s" | "submit" => Input::Submit,
        "q" | "quit" => Input::Quit,
        "?" | "help" => Input::Help,
        "h" | "hint" => Input::Hint(rest.to_string()),
        "g" | "goto" => match rest.parse() {
            Ok(n) => Input::GoTo(n),
            Err(_) => Input::Unknown(line.to_string()),
        },
        _ => {
            let numbers: Result<Vec<usize>, _> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            match numbers {
                Ok(numbers) if !numbers.is_empty() && !numbers.contains(&0) => {
                    Input::Toggle(numbers)
                }
                _ => Input::Unknown(line.to_string()),
            }
        }
    }
}

async fn next_countdown_event(countdown: &mut Option<Countdown>) -> CountdownEvent {
    if let Some(countdown) = countdown {
        if let Some(event) = countdown.next_event().await {
            return event;
        }
    }
    std::future::pending().await
}

/// Drain countdown ticks until expiry. Pending forever without a timer.
async fn until_expired(countdown: &mut Option<Countdown>, remaining: &mut Option<u64>) {
    loop {
        match next_countdown_event(countdown).await {
            CountdownEvent::Tick { remaining_secs } => *remaining = Some(remaining_secs),
            CountdownEvent::Expired => return,
        }
    }
}

/// Run `work` unless the countdown expires first. Returns `false` on expiry.
async fn race_countdown(
    work: impl std::future::Future<Output = ()>,
    countdown: &mut Option<Countdown>,
    remaining: &mut Option<u64>,
) -> bool {
    tokio::select! {
        _ = work => true,
        _ = until_expired(countdown, remaining) => false,
    }
}

async fn run_interactive(
    workspace: &Workspace,
    session: &mut ExamSession<'_>,
    provider_name: Option<&str>,
) -> Result<Option<QuizResult>> {
    let quiz = session.quiz();
    let reduce_motion = workspace.preferences().settings().reduce_motion;
    let mut countdown = Countdown::for_quiz(quiz);
    let mut remaining = countdown.as_ref().map(Countdown::total_secs);
    let mut hints: Option<Provider> = None;

    println!("{} ({} questions)", quiz.title, quiz.questions.len());
    if let Some(secs) = remaining {
        println!("Time limit: {}", format_clock(secs));
    }
    print_help(quiz.settings.assistant_enabled);
    show_question(session, remaining);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = next_countdown_event(&mut countdown) => match event {
                CountdownEvent::Tick { remaining_secs } => {
                    remaining = Some(remaining_secs);
                    if remaining_secs % 60 == 0 || (!reduce_motion && remaining_secs <= 10) {
                        eprintln!("[{} left]", format_clock(remaining_secs));
                    }
                }
                CountdownEvent::Expired => {
                    println!("\nTime is up! Submitting your answers.");
                    return Ok(session.submit());
                }
            },
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    println!("\nInput closed, submitting your answers.");
                    stop(&mut countdown);
                    return Ok(session.submit());
                };
                match parse_input(&line) {
                    Input::Toggle(numbers) => {
                        for n in numbers {
                            if !session.toggle(n - 1) {
                                println!("There is no option {n}.");
                            }
                        }
                        show_question(session, remaining);
                    }
                    Input::Next => {
                        if !session.next() {
                            println!("This is the last question. Type `s` to submit.");
                        }
                        show_question(session, remaining);
                    }
                    Input::Previous => {
                        if !session.previous() {
                            println!("This is the first question.");
                        }
                        show_question(session, remaining);
                    }
                    Input::GoTo(n) => {
                        if n == 0 || !session.go_to(n - 1) {
                            println!("There is no question {n}.");
                        }
                        show_question(session, remaining);
                    }
                    Input::Hint(text) => {
                        let hint = ask_hint(workspace, session, provider_name, &mut hints, &text);
                        if !race_countdown(hint, &mut countdown, &mut remaining).await {
                            println!("\nTime is up! Submitting your answers.");
                            return Ok(session.submit());
                        }
                    }
                    Input::Submit => {
                        let unanswered = quiz.questions.len() - session.answers().answered_count();
                        if unanswered > 0 {
                            println!("Submitting with {unanswered} unanswered question(s).");
                        }
                        stop(&mut countdown);
                        return Ok(session.submit());
                    }
                    Input::Quit => {
                        stop(&mut countdown);
                        return Ok(None);
                    }
                    Input::Help => print_help(quiz.settings.assistant_enabled),
                    Input::Show => show_question(session, remaining),
                    Input::Unknown(raw) => println!("Unrecognized input '{raw}'. Type `?` for help."),
                }
            }
        }
    }
}

fn stop(countdown: &mut Option<Countdown>) {
    if let Some(countdown) = countdown {
        countdown.cancel();
    }
}

async fn ask_hint(
    workspace: &Workspace,
    session: &ExamSession<'_>,
    provider_name: Option<&str>,
    hints: &mut Option<Provider>,
    text: &str,
) {
    if !session.quiz().settings.assistant_enabled {
        println!("The assistant is disabled for this quiz.");
        return;
    }
    if text.is_empty() {
        println!("Ask something, e.g. `h what does borrowing mean?`");
        return;
    }
    if hints.is_none() {
        match workspace.provider(provider_name) {
            Ok(provider) => *hints = Some(provider),
            Err(e) => {
                println!("The assistant is unavailable: {e:#}");
                return;
            }
        }
    }
    if let Some(provider) = hints {
        let hint = provider.hints.hint(session.current_question(), text).await;
        println!("\nAssistant: {hint}\n");
    }
}

fn print_help(assistant: bool) {
    println!("Commands:");
    println!("  1 / 1,3    toggle option(s) of the current question");
    println!("  n / p      next / previous question");
    println!("  g N        go to question N");
    if assistant {
        println!("  h TEXT     ask the assistant for a hint");
    }
    println!("  s          submit");
    println!("  q          quit without grading");
}

fn show_question(session: &ExamSession<'_>, remaining: Option<u64>) {
    let quiz = session.quiz();
    let index = session.current_index();
    let question = session.current_question();

    println!();
    print!("Question {}/{} ({})", index + 1, quiz.questions.len(), question.question_type.label());
    if let Some(secs) = remaining {
        print!("  [{} left]", format_clock(secs));
    }
    println!();
    println!("{}", question.text);
    for (o, option) in question.options.iter().enumerate() {
        let selected = session.answers().is_selected(index, o);
        let mark = match (question.question_type, selected) {
            (QuestionType::SingleSelect, true) => "(*)",
            (QuestionType::SingleSelect, false) => "( )",
            (QuestionType::MultiSelect, true) => "[x]",
            (QuestionType::MultiSelect, false) => "[ ]",
        };
        println!("  {mark} {}. {}", o + 1, option.text);
    }
}

fn print_result(quiz: &Quiz, result: &QuizResult) {
    let outcomes = outcomes(quiz, &result.answers);
    let correct = outcomes.iter().filter(|o| o.correct).count();

    println!();
    println!("Final Score: {}%", display_percent(result.score));
    println!("{correct} of {} correct", quiz.questions.len());

    for (i, (question, outcome)) in quiz.questions.iter().zip(&outcomes).enumerate() {
        let verdict = if outcome.correct { "\u{2713}" } else { "\u{2717}" };
        println!();
        println!("{verdict} {}. {}", i + 1, question.text);
        for (o, option) in question.options.iter().enumerate() {
            let mark = classify_option(option.is_correct, outcome.selected.contains(&o));
            let symbol = match mark.symbol() {
                "" => " ",
                s => s,
            };
            let yours = if outcome.selected.contains(&o) { " (your answer)" } else { "" };
            println!("   {symbol} {}{yours}", option.text);
            if !option.explanation.is_empty() {
                println!("       {}", option.explanation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::model::{AnswerOption, ExamSettings, Question, QuestionSet};

    fn quiz() -> Quiz {
        let question = |question_type, correct: &[usize]| Question {
            text: "q".into(),
            question_type,
            options: (0..3)
                .map(|i| AnswerOption {
                    text: format!("o{i}"),
                    is_correct: correct.contains(&i),
                    explanation: String::new(),
                })
                .collect(),
        };
        Quiz::from_question_set(
            QuestionSet {
                title: "t".into(),
                topic: "t".into(),
                questions: vec![
                    question(QuestionType::SingleSelect, &[1]),
                    question(QuestionType::MultiSelect, &[0, 2]),
                ],
            },
            ExamSettings::default(),
        )
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("2"), Input::Toggle(vec![2]));
        assert_eq!(parse_input(" 1, 3 "), Input::Toggle(vec![1, 3]));
        assert_eq!(parse_input("1 3"), Input::Toggle(vec![1, 3]));
        assert_eq!(parse_input("n"), Input::Next);
        assert_eq!(parse_input("PREV"), Input::Previous);
        assert_eq!(parse_input("g 4"), Input::GoTo(4));
        assert_eq!(parse_input("h what is a lifetime?"), Input::Hint("what is a lifetime?".into()));
        assert_eq!(parse_input("s"), Input::Submit);
        assert_eq!(parse_input(""), Input::Show);
        assert_eq!(parse_input("0"), Input::Unknown("0".into()));
        assert_eq!(parse_input("g x"), Input::Unknown("g x".into()));
        assert_eq!(parse_input("banana"), Input::Unknown("banana".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_interrupts_slow_work() {
        let mut countdown = Some(Countdown::start(std::time::Duration::from_secs(3)));
        let mut remaining = None;
        let started = tokio::time::Instant::now();

        let slow = tokio::time::sleep(std::time::Duration::from_secs(120));
        let finished = race_countdown(slow, &mut countdown, &mut remaining).await;

        assert!(!finished);
        assert_eq!(remaining, Some(1));
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn work_finishes_without_a_timer() {
        let mut countdown = None;
        let mut remaining = None;
        let quick = tokio::time::sleep(std::time::Duration::from_secs(120));
        assert!(race_countdown(quick, &mut countdown, &mut remaining).await);
        assert_eq!(remaining, None);
    }

    #[test]
    fn scripted_answers_are_checked() {
        let quiz = quiz();

        let mut session = ExamSession::new(&quiz);
        apply_answers(&mut session, &"0:1;1:0,2".parse().unwrap()).unwrap();
        assert_eq!(session.submit().unwrap().score, 100.0);

        let mut session = ExamSession::new(&quiz);
        assert!(apply_answers(&mut session, &"5:0".parse().unwrap()).is_err());

        let mut session = ExamSession::new(&quiz);
        assert!(apply_answers(&mut session, &"0:0,1".parse().unwrap()).is_err());

        let mut session = ExamSession::new(&quiz);
        assert!(apply_answers(&mut session, &"1:9".parse().unwrap()).is_err());
    }
}
