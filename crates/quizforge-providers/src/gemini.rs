//! Google Gemini provider.
//!
//! Talks to the `generateContent` REST endpoint. Generation asks for a JSON
//! response constrained by a schema and validates the result before handing
//! it back; hints are plain text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;

use quizforge_core::error::ProviderError;
use quizforge_core::model::{Question, QuestionSet, QuestionType};
use quizforge_core::parser::{ensure_well_formed, parse_question_set_str};
use quizforge_core::traits::{GenerationRequest, HintProvider, QuizGenerator, HINT_APOLOGY};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_HINT_MODEL: &str = "gemini-2.5-flash";

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    generation_model: String,
    hint_model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        generation_model: &str,
        hint_model: &str,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            generation_model: generation_model.to_string(),
            hint_model: hint_model.to_string(),
            client,
        })
    }

    /// One `generateContent` round trip, returning the concatenated text of
    /// the first candidate.
    async fn generate_content(
        &self,
        model: &str,
        body: &GeminiRequest,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                .saturating_mul(1000);
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(error_message(body)));
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(model.to_string()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: error_message(body),
            });
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let text: String = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("empty response".into()));
        }
        Ok(text)
    }
}

fn error_message(body: String) -> String {
    serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn user_message(prompt: String) -> Vec<GeminiContent> {
    vec![GeminiContent {
        role: Some("user".to_string()),
        parts: vec![GeminiPart { text: Some(prompt) }],
    }]
}

/// JSON schema the generation response must follow.
fn question_set_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "A creative and engaging title for the quiz." },
            "topic": { "type": "STRING", "description": "The specific topic of the quiz that was requested." },
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "questionText": { "type": "STRING", "description": "The question. May use Markdown." },
                        "questionType": {
                            "type": "STRING",
                            "enum": [QuestionType::SingleSelect.as_str(), QuestionType::MultiSelect.as_str()]
                        },
                        "options": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "optionText": { "type": "STRING" },
                                    "isCorrect": { "type": "BOOLEAN" },
                                    "explanation": { "type": "STRING", "description": "Why this option is correct or incorrect." }
                                },
                                "required": ["optionText", "isCorrect", "explanation"]
                            }
                        }
                    },
                    "required": ["questionText", "questionType", "options"]
                }
            }
        },
        "required": ["title", "topic", "questions"]
    })
}

fn generation_prompt(request: &GenerationRequest) -> String {
    let types: Vec<&str> = request.types.iter().map(|t| t.as_str()).collect();
    format!(
        "Create a quiz about \"{topic}\".\n\
         The quiz must have exactly {count} questions.\n\
         The question types should be a mix of the following: {types}.\n\
         For each question, provide the question text, a question type ({single} or {multi}), and 4-5 answer options.\n\
         For each option, provide the option text, whether it is correct ('isCorrect'), and a brief explanation of why it is correct or incorrect.\n\
         Every question must have at least one correct option. {single} questions must have exactly one correct option.\n\
         Question and option text may use Markdown (code blocks, bold).",
        topic = request.topic,
        count = request.count,
        types = types.join(", "),
        single = QuestionType::SingleSelect.as_str(),
        multi = QuestionType::MultiSelect.as_str(),
    )
}

fn hint_prompt(question: &Question, user_text: &str) -> String {
    let options: Vec<String> = question
        .options
        .iter()
        .map(|o| format!("- {}", o.text))
        .collect();
    format!(
        "You are the assistant of a quiz application. Give hints, never answers.\n\
         A user is stuck on this question:\n---\n\
         Question: {question}\n\
         Options:\n{options}\n---\n\
         The user asks: \"{user_text}\"\n\n\
         Give a concise hint (2-3 sentences) that explains a concept, asks a leading question or clarifies a term.\n\
         Do not say which option is correct or incorrect.",
        question = question.text,
        options = options.join("\n"),
    )
}

#[async_trait]
impl QuizGenerator for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.generation_model, topic = %request.topic, count = request.count))]
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<QuestionSet> {
        let body = GeminiRequest {
            contents: user_message(generation_prompt(request)),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: question_set_schema(),
            }),
        };

        let text = self.generate_content(&self.generation_model, &body).await?;

        let mut set = parse_question_set_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(format!("{e:#}")))?;
        ensure_well_formed(&set.questions)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if set.topic.trim().is_empty() {
            set.topic = request.topic.clone();
        }
        if set.questions.len() != request.count as usize {
            tracing::warn!(
                requested = request.count,
                received = set.questions.len(),
                "generator returned a different number of questions"
            );
        }
        Ok(set)
    }
}

#[async_trait]
impl HintProvider for GeminiProvider {
    #[instrument(skip_all, fields(model = %self.hint_model))]
    async fn hint(&self, question: &Question, user_text: &str) -> String {
        let body = GeminiRequest {
            contents: user_message(hint_prompt(question, user_text)),
            generation_config: None,
        };
        match self.generate_content(&self.hint_model, &body).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::error!("hint request failed: {e}");
                HINT_APOLOGY.to_string()
            }
        }
    }
}
