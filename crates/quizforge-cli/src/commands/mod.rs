//! Subcommand implementations.

pub mod delete;
pub mod export;
pub mod generate;
pub mod hint;
pub mod import;
pub mod init;
pub mod list;
pub mod settings;
pub mod take;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizforge_core::library::QuizLibrary;
use quizforge_core::model::{ExamSettings, Quiz};
use quizforge_core::parser::ValidationWarning;
use quizforge_core::settings::Preferences;
use quizforge_core::store::FileStore;
use quizforge_core::traits::KeyValueStore;
use quizforge_providers::config::load_config_from;
use quizforge_providers::{create_provider, Provider, QuizforgeConfig};

/// Global options shared by every subcommand.
pub struct Env {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Loaded configuration plus the store it points at.
pub struct Workspace {
    pub config: QuizforgeConfig,
    pub store: Arc<dyn KeyValueStore>,
}

impl Workspace {
    pub fn open(env: &Env) -> Result<Self> {
        let config = load_config_from(env.config_path.as_deref())?;
        let data_dir = env
            .data_dir
            .clone()
            .unwrap_or_else(|| config.data_dir.clone());
        tracing::debug!(data_dir = %data_dir.display(), "opening store");
        Ok(Self {
            config,
            store: Arc::new(FileStore::new(data_dir)),
        })
    }

    pub fn library(&self) -> QuizLibrary {
        QuizLibrary::load(self.store.clone())
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::load(self.store.clone())
    }

    pub fn provider(&self, name: Option<&str>) -> Result<Provider> {
        let name = name.unwrap_or(&self.config.default_provider);
        create_provider(&self.config, name)
    }
}

/// Look up a quiz by id or unique id prefix.
pub fn find_quiz<'a>(library: &'a QuizLibrary, id: &str) -> Result<&'a Quiz> {
    library
        .find(id)
        .with_context(|| format!("no quiz matches id '{id}' (see `quizforge list`)"))
}

/// Add a quiz to the library and report it.
pub fn save_new_quiz(library: &mut QuizLibrary, quiz: Quiz) {
    let quiz = library.add(quiz);
    println!(
        "Created quiz {} \"{}\" ({} questions)",
        quiz.id,
        quiz.title,
        quiz.questions.len()
    );
}

pub fn exam_settings(timer_minutes: u32, assistant_enabled: bool) -> ExamSettings {
    ExamSettings {
        timer_minutes,
        assistant_enabled,
    }
}

pub fn print_warnings(warnings: &[ValidationWarning]) {
    for w in warnings {
        match w.question {
            Some(q) => eprintln!("  warning: question {}: {}", q + 1, w.message),
            None => eprintln!("  warning: {}", w.message),
        }
    }
}
