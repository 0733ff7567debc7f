//! The `quizforge hint` command.

use anyhow::Result;

use super::{find_quiz, Env, Workspace};

pub async fn execute(
    env: &Env,
    id: String,
    question: usize,
    text: String,
    provider: Option<String>,
) -> Result<()> {
    let workspace = Workspace::open(env)?;
    let library = workspace.library();
    let quiz = find_quiz(&library, &id)?;

    anyhow::ensure!(
        quiz.settings.assistant_enabled,
        "the assistant is disabled for \"{}\"",
        quiz.title
    );
    anyhow::ensure!(
        (1..=quiz.questions.len()).contains(&question),
        "question must be between 1 and {}",
        quiz.questions.len()
    );
    anyhow::ensure!(!text.trim().is_empty(), "ask something with --text");

    let provider = workspace.provider(provider.as_deref())?;
    let hint = provider.hints.hint(&quiz.questions[question - 1], &text).await;
    println!("{hint}");
    Ok(())
}
