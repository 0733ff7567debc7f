//! The `quizforge init` command.

use anyhow::Result;

use quizforge_providers::config::STARTER_CONFIG;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("quizforge.toml");
    if path.exists() {
        println!("quizforge.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write(path, STARTER_CONFIG)?;
    println!("Created quizforge.toml");

    println!("\nNext steps:");
    println!("  1. export QUIZFORGE_GEMINI_KEY=<your key>");
    println!("  2. Run: quizforge generate --topic \"Rust ownership\" --count 5");
    println!("  3. Run: quizforge list");

    Ok(())
}
