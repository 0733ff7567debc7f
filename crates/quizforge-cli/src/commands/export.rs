//! The `quizforge export` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_export::{export_template, write_artifact, ExportOptions};

use super::{find_quiz, Env, Workspace};

pub fn execute(env: &Env, id: String, output: PathBuf) -> Result<()> {
    let workspace = Workspace::open(env)?;
    let library = workspace.library();
    let quiz = find_quiz(&library, &id)?;

    let options = ExportOptions::from(workspace.preferences().settings());
    let path = write_artifact(&export_template(quiz, &options), &output)?;
    println!("Exported template to {}", path.display());
    Ok(())
}
