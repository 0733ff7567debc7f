//! Standalone HTML export for quizforge.
//!
//! Two artifacts exist: an interactive *template* the reader can take and
//! grade offline, and a static *results* page for a graded attempt. Both are
//! single self-contained files with styles, themes and script inlined.

pub mod document;
pub mod escape;
pub mod results;
pub mod script;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizforge_core::model::{Quiz, QuizResult};

pub use document::{synthesize, ExportOptions};
pub use script::THEME_STORAGE_KEY;

/// A rendered document and the file name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub html: String,
}

/// File-name stem for a topic: lowercase ASCII alphanumerics, with each run
/// of anything else collapsed into a single `_`.
pub fn slug(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len());
    let mut in_gap = false;
    for c in topic.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }
    if out.is_empty() {
        "quiz".to_string()
    } else {
        out
    }
}

/// Interactive template with an embedded data island.
pub fn export_template(quiz: &Quiz, options: &ExportOptions) -> ExportArtifact {
    let (body, data_json) = template::build_template(quiz);
    let title = format!("{} - Template", quiz.title);
    ExportArtifact {
        filename: format!("{}_template.html", slug(&quiz.topic)),
        html: synthesize(&title, &body, Some(&data_json), options),
    }
}

/// Pre-graded results page. Carries no data island and no inputs.
pub fn export_results(quiz: &Quiz, result: &QuizResult, options: &ExportOptions) -> ExportArtifact {
    let body = results::build_results(quiz, result);
    let title = format!("{} - Results", quiz.title);
    ExportArtifact {
        filename: format!("{}_results.html", slug(&quiz.topic)),
        html: synthesize(&title, &body, None, options),
    }
}

/// Write an artifact into `dir`, creating it if needed.
pub fn write_artifact(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.html)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = artifact.html.len(), "wrote export");
    Ok(path)
}
