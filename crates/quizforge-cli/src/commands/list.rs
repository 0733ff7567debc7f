//! The `quizforge list` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{Env, Workspace};

pub fn execute(env: &Env, json: bool) -> Result<()> {
    let workspace = Workspace::open(env)?;
    let library = workspace.library();

    if json {
        println!("{}", serde_json::to_string_pretty(library.quizzes())?);
        return Ok(());
    }

    if library.is_empty() {
        println!("No quizzes yet. Run `quizforge generate --topic <topic>` to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Title",
        "Topic",
        "Questions",
        "Timer",
        "Assistant",
        "Created",
    ]);

    for quiz in library.quizzes() {
        let timer = match quiz.settings.timer_minutes {
            0 => "-".to_string(),
            m => format!("{m} min"),
        };
        table.add_row(vec![
            Cell::new(quiz.id.chars().take(8).collect::<String>()),
            Cell::new(&quiz.title),
            Cell::new(&quiz.topic),
            Cell::new(quiz.questions.len()),
            Cell::new(timer),
            Cell::new(if quiz.settings.assistant_enabled { "yes" } else { "no" }),
            Cell::new(quiz.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    Ok(())
}
