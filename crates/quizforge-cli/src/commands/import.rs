//! The `quizforge import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizforge_core::model::Quiz;
use quizforge_core::parser::{ensure_well_formed, parse_question_set, validate_question_set};

use super::{exam_settings, print_warnings, save_new_quiz, Env, Workspace};

pub fn execute(env: &Env, file: PathBuf, timer: u32, assistant: bool) -> Result<()> {
    let set = parse_question_set(&file)?;
    ensure_well_formed(&set.questions)
        .with_context(|| format!("{} is not a usable quiz", file.display()))?;
    print_warnings(&validate_question_set(&set));

    let workspace = Workspace::open(env)?;
    let mut library = workspace.library();
    save_new_quiz(
        &mut library,
        Quiz::from_question_set(set, exam_settings(timer, assistant)),
    );
    Ok(())
}
