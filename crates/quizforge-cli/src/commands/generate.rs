//! The `quizforge generate` command.

use anyhow::Result;

use quizforge_core::model::{QuestionType, Quiz};
use quizforge_core::parser::validate_question_set;
use quizforge_core::traits::GenerationRequest;
use quizforge_providers::generate_with_retry;

use super::{exam_settings, print_warnings, save_new_quiz, Env, Workspace};

const GENERATION_FAILED: &str =
    "Failed to generate the quiz. Please check the topic and try again.";

pub async fn execute(
    env: &Env,
    topic: String,
    count: u32,
    types: String,
    timer: u32,
    assistant: bool,
    provider: Option<String>,
) -> Result<()> {
    let types = parse_types(&types)?;
    let request = GenerationRequest::new(topic, count, types)?;

    let workspace = Workspace::open(env)?;
    let provider = workspace.provider(provider.as_deref())?;

    eprintln!(
        "Generating {} question(s) about \"{}\" with {}...",
        request.count,
        request.topic,
        provider.generator.name()
    );

    let set = match generate_with_retry(
        provider.generator.as_ref(),
        &request,
        workspace.config.retry_policy(),
    )
    .await
    {
        Ok(set) => set,
        Err(e) => {
            tracing::error!("generation failed: {e:#}");
            anyhow::bail!(GENERATION_FAILED);
        }
    };

    print_warnings(&validate_question_set(&set));

    let mut library = workspace.library();
    save_new_quiz(
        &mut library,
        Quiz::from_question_set(set, exam_settings(timer, assistant)),
    );
    Ok(())
}

fn parse_types(raw: &str) -> Result<Vec<QuestionType>> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<QuestionType>().map_err(anyhow::Error::msg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_parse_from_list() {
        assert_eq!(
            parse_types("single, multi").unwrap(),
            vec![QuestionType::SingleSelect, QuestionType::MultiSelect]
        );
        assert_eq!(parse_types("").unwrap(), vec![]);
        assert!(parse_types("single,essay").is_err());
    }
}
