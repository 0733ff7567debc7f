//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
default_provider = "mock"
data_dir = "data"
max_retries = 1
retry_delay_ms = 1

[providers.mock]
type = "mock"
hint = "Consider what each option guarantees."

[providers.broken]
type = "mock"
fail_generation = true
"#;

fn quizforge(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizforge").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("QUIZFORGE_GEMINI_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("quizforge.toml"), CONFIG).unwrap();
    dir
}

fn library(dir: &TempDir) -> Vec<serde_json::Value> {
    let path = dir.path().join("data/quizforge.library.json");
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str::<serde_json::Value>(&content)
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

/// Generate a two-question quiz (single, then multi) and return its id.
fn generate(dir: &TempDir, extra: &[&str]) -> String {
    quizforge(dir)
        .args(["generate", "--topic", "Rust Traits", "--count", "2"])
        .args(extra)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quiz"));
    library(dir).last().unwrap()["id"].as_str().unwrap().to_string()
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    quizforge(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizforge.toml"));
    assert!(dir.path().join("quizforge.toml").exists());

    quizforge(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn generate_and_list() {
    let dir = workspace();
    let id = generate(&dir, &["--timer", "10"]);

    let quizzes = library(&dir);
    assert_eq!(quizzes.len(), 1);
    assert_eq!(quizzes[0]["settings"]["timer_minutes"], 10);

    quizforge(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(&id[..8]))
        .stdout(predicate::str::contains("Rust Traits"))
        .stdout(predicate::str::contains("10 min"));
}

#[test]
fn failed_generation_persists_nothing() {
    let dir = workspace();

    quizforge(&dir)
        .args(["generate", "--topic", "Anything", "--provider", "broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to generate the quiz. Please check the topic and try again.",
        ));

    assert!(!dir.path().join("data/quizforge.library.json").exists());
}

#[test]
fn generate_rejects_bad_requests() {
    let dir = workspace();

    quizforge(&dir)
        .args(["generate", "--topic", "Rust", "--count", "26"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 25"));

    quizforge(&dir)
        .args(["generate", "--topic", "Rust", "--types", "essay"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown question type"));
}

#[test]
fn take_with_scripted_answers() {
    let dir = workspace();
    let id = generate(&dir, &[]);

    quizforge(&dir)
        .args(["take", "--id", &id, "--answers", "0:0;1:0,2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final Score: 100%"))
        .stdout(predicate::str::contains("2 of 2 correct"));

    quizforge(&dir)
        .args(["take", "--id", &id[..8], "--answers", "0:1;1:0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final Score: 0%"));
}

#[test]
fn take_interactively() {
    let dir = workspace();
    let id = generate(&dir, &[]);

    quizforge(&dir)
        .args(["take", "--id", &id])
        .write_stdin("1\nn\n1\n3\ns\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2/2 (Multi select)"))
        .stdout(predicate::str::contains("Final Score: 100%"));
}

#[test]
fn quitting_grades_nothing() {
    let dir = workspace();
    let id = generate(&dir, &[]);

    quizforge(&dir)
        .args(["take", "--id", &id])
        .write_stdin("2\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing was graded"))
        .stdout(predicate::str::contains("Final Score").not());
}

#[test]
fn take_exports_results() {
    let dir = workspace();
    let id = generate(&dir, &[]);

    quizforge(&dir)
        .args(["take", "--id", &id, "--answers", "0:0", "--export", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final Score: 50%"))
        .stdout(predicate::str::contains("Exported results"));

    let html = std::fs::read_to_string(dir.path().join("out/rust_traits_results.html")).unwrap();
    assert!(html.contains("<span class=\"score\">50%</span>"));
    assert!(!html.contains("id=\"quiz-data\""));
}

#[test]
fn export_template_uses_settings_theme() {
    let dir = workspace();
    let id = generate(&dir, &[]);

    quizforge(&dir)
        .args(["settings", "--theme", "dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme          dark"));

    quizforge(&dir)
        .args(["export", "--id", &id, "--output", "exports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rust_traits_template.html"));

    let html =
        std::fs::read_to_string(dir.path().join("exports/rust_traits_template.html")).unwrap();
    assert!(html.contains("data-theme=\"dark\""));
    assert!(html.contains("<script id=\"quiz-data\" type=\"application/json\">"));
}

#[test]
fn export_carries_accessibility_settings() {
    let dir = workspace();
    let id = generate(&dir, &[]);

    quizforge(&dir)
        .args(["settings", "--high-contrast", "true", "--reduce-motion", "true"])
        .assert()
        .success();
    quizforge(&dir)
        .args(["export", "--id", &id, "--output", "exports"])
        .assert()
        .success();

    let html =
        std::fs::read_to_string(dir.path().join("exports/rust_traits_template.html")).unwrap();
    assert!(html.contains("data-contrast=\"high\" data-motion=\"reduce\""));
}

#[test]
fn settings_reject_invalid_values_and_reset() {
    let dir = workspace();

    quizforge(&dir)
        .args(["settings", "--theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown theme"));

    quizforge(&dir)
        .args(["settings", "--font-size", "40"])
        .assert()
        .failure();

    quizforge(&dir)
        .args(["settings", "--font-size", "20", "--font-family", "serif"])
        .assert()
        .success()
        .stdout(predicate::str::contains("font-size      20px"))
        .stdout(predicate::str::contains("font-family    serif"));

    quizforge(&dir)
        .args(["settings", "--reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("theme          forest"))
        .stdout(predicate::str::contains("font-size      16px"));
}

#[test]
fn hint_requires_assistant() {
    let dir = workspace();
    let without = generate(&dir, &[]);
    let with = generate(&dir, &["--assistant"]);

    quizforge(&dir)
        .args(["hint", "--id", &without, "--question", "1", "--text", "help"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("assistant is disabled"));

    quizforge(&dir)
        .args(["hint", "--id", &with, "--question", "1", "--text", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consider what each option guarantees."));
}

#[test]
fn delete_removes_quiz() {
    let dir = workspace();
    let id = generate(&dir, &[]);

    quizforge(&dir)
        .args(["delete", "--id", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted quiz"));
    assert!(library(&dir).is_empty());

    quizforge(&dir)
        .args(["delete", "--id", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quiz matches"));
}

#[test]
fn import_question_set() {
    let dir = workspace();
    let file = dir.path().join("set.json");
    std::fs::write(
        &file,
        r#"{
  "title": "Imported",
  "topic": "Closures",
  "questions": [{
    "questionText": "Which trait does a closure that mutates captured state implement?",
    "questionType": "MULTIPLE_CHOICE",
    "options": [
      { "optionText": "Fn", "isCorrect": false, "explanation": "Fn cannot mutate." },
      { "optionText": "FnMut", "isCorrect": true, "explanation": "Mutable borrow of captures." }
    ]
  }]
}"#,
    )
    .unwrap();

    quizforge(&dir)
        .args(["import", "--file", "set.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Imported\" (1 questions)"));
    assert_eq!(library(&dir)[0]["questions"][0]["question_type"], "SINGLE_SELECT");

    std::fs::write(
        &file,
        r#"{"title": "Empty", "topic": "x", "questions": []}"#,
    )
    .unwrap();
    quizforge(&dir)
        .args(["import", "--file", "set.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions"));
}

#[test]
fn corrupt_library_is_kept_as_backup() {
    let dir = workspace();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data/quizforge.library.json"), "[{\"id\": ").unwrap();

    generate(&dir, &[]);

    assert_eq!(library(&dir).len(), 1);
    let backup = std::fs::read_to_string(dir.path().join("data/quizforge.library.json.bak")).unwrap();
    assert_eq!(backup, "[{\"id\": ");
}

#[test]
fn unknown_quiz_id_fails() {
    let dir = workspace();
    quizforge(&dir)
        .args(["export", "--id", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
