//! quizforge CLI — generate, take, and export quizzes from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "AI-generated quizzes with standalone HTML export")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter quizforge.toml
    Init,

    /// Generate a quiz with an AI provider and add it to the library
    Generate {
        /// What the quiz is about
        #[arg(long)]
        topic: String,

        /// Number of questions (1-25)
        #[arg(long, default_value = "5")]
        count: u32,

        /// Question types to mix (comma-separated: single, multi)
        #[arg(long, default_value = "single,multi")]
        types: String,

        /// Countdown in minutes (0 disables the timer)
        #[arg(long, default_value = "0")]
        timer: u32,

        /// Allow the hint assistant during attempts
        #[arg(long)]
        assistant: bool,

        /// Provider name from the config (default: default_provider)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Add a quiz from a question-set JSON file
    Import {
        /// Path to the JSON file
        #[arg(long)]
        file: PathBuf,

        /// Countdown in minutes (0 disables the timer)
        #[arg(long, default_value = "0")]
        timer: u32,

        /// Allow the hint assistant during attempts
        #[arg(long)]
        assistant: bool,
    },

    /// List quizzes in the library
    List {
        /// Print the full library as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete a quiz from the library
    Delete {
        /// Quiz id (a unique prefix is enough)
        #[arg(long)]
        id: String,
    },

    /// Take a quiz
    Take {
        /// Quiz id (a unique prefix is enough)
        #[arg(long)]
        id: String,

        /// Answer non-interactively, e.g. "0:1;1:0,2" (0-based indices)
        #[arg(long)]
        answers: Option<String>,

        /// Write a results document to this directory after grading
        #[arg(long)]
        export: Option<PathBuf>,

        /// Provider used for hints (default: default_provider)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Ask the assistant for a hint on one question
    Hint {
        /// Quiz id (a unique prefix is enough)
        #[arg(long)]
        id: String,

        /// Question number (1-based)
        #[arg(long)]
        question: usize,

        /// What you want to ask
        #[arg(long)]
        text: String,

        /// Provider name from the config (default: default_provider)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Export a quiz as an interactive standalone HTML template
    Export {
        /// Quiz id (a unique prefix is enough)
        #[arg(long)]
        id: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },

    /// Show or change display settings
    Settings {
        /// Theme: forest, light, dark
        #[arg(long)]
        theme: Option<String>,

        /// Base font size in pixels (12-24)
        #[arg(long)]
        font_size: Option<u32>,

        /// Font family: sans-serif, serif, monospace
        #[arg(long)]
        font_family: Option<String>,

        #[arg(long)]
        high_contrast: Option<bool>,

        #[arg(long)]
        reduce_motion: Option<bool>,

        /// Restore the defaults
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() {
    let directive = match "quizforge=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("Error: invalid log directive: {e}");
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let env = commands::Env {
        config_path: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Generate {
            topic,
            count,
            types,
            timer,
            assistant,
            provider,
        } => {
            commands::generate::execute(&env, topic, count, types, timer, assistant, provider).await
        }
        Commands::Import {
            file,
            timer,
            assistant,
        } => commands::import::execute(&env, file, timer, assistant),
        Commands::List { json } => commands::list::execute(&env, json),
        Commands::Delete { id } => commands::delete::execute(&env, id),
        Commands::Take {
            id,
            answers,
            export,
            provider,
        } => commands::take::execute(&env, id, answers, export, provider).await,
        Commands::Hint {
            id,
            question,
            text,
            provider,
        } => commands::hint::execute(&env, id, question, text, provider).await,
        Commands::Export { id, output } => commands::export::execute(&env, id, output),
        Commands::Settings {
            theme,
            font_size,
            font_family,
            high_contrast,
            reduce_motion,
            reset,
        } => commands::settings::execute(
            &env,
            commands::settings::Changes {
                theme,
                font_size,
                font_family,
                high_contrast,
                reduce_motion,
                reset,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
