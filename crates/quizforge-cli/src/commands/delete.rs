//! The `quizforge delete` command.

use anyhow::Result;

use super::{find_quiz, Env, Workspace};

pub fn execute(env: &Env, id: String) -> Result<()> {
    let workspace = Workspace::open(env)?;
    let mut library = workspace.library();

    let quiz = find_quiz(&library, &id)?;
    let (full_id, title) = (quiz.id.clone(), quiz.title.clone());

    library.delete(&full_id);
    println!("Deleted quiz {full_id} \"{title}\"");
    Ok(())
}
