mod ollama;
mod openai;

use async_trait::async_trait;
use std::time::Duration;

use crate::types::QuestionDraft;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Result alias for generation calls
pub type LlmResult<T> = Result<T, LlmError>;

/// Failures a generation attempt can produce
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("{0}")]
    ParseError(String),
}

/// How many questions a generation run must yield
const GENERATED_QUESTION_COUNT: usize = 5;

/// Shared authoring instructions. OpenAI sends this as the system message,
/// Ollama prepends it to the prompt.
const QUESTION_SYSTEM_PROMPT: &str = r#"You are a quiz author. Write exactly 5 multiple-choice questions covering the syllabus you are given.

Respond with ONLY a JSON array, no prose and no code fences. Every element must look like:
{"questionText": "...", "options": [{"id": "a", "text": "..."}, {"id": "b", "text": "..."}, {"id": "c", "text": "..."}, {"id": "d", "text": "..."}], "correctAnswer": "a", "explanation": "..."}

Use exactly the option ids a, b, c and d. "correctAnswer" is the id of the right option. Keep every explanation to one or two sentences."#;

/// One generation call
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The syllabus text the questions should cover
    pub prompt: String,
    /// Upper bound on the reply length, in provider tokens
    pub max_tokens: Option<u32>,
    /// Hard deadline for the call
    pub timeout: Duration,
}

/// Raw text coming back from a provider
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// Model output as plain text
    pub text: String,
    /// Which backend answered and how the call went
    pub metadata: ResponseMetadata,
}

/// Call metadata attached to a provider reply
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// Backend name, e.g. "openai"
    pub provider: String,
    /// Model that served the call
    pub model: String,
    /// Total tokens billed, when the backend reports them
    pub tokens_used: Option<u32>,
    /// Wall-clock duration of the call in milliseconds
    pub latency_ms: u64,
}

/// Interface every text generation backend implements
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate raw text for the given request
    async fn generate(&self, request: GenerateRequest) -> LlmResult<GenerateResponse>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}

/// Manager for the configured LLM providers
pub struct LlmManager {
    pub providers: Vec<Box<dyn LlmProvider>>,
}

impl LlmManager {
    /// Wrap an ordered provider list; the first entry is the primary
    pub fn new(providers: Vec<Box<dyn LlmProvider>>) -> Self {
        Self { providers }
    }

    /// Ask the primary provider for a question set. The first configured
    /// provider wins; there is no fallback and no retry.
    pub async fn generate_questions(
        &self,
        syllabus: &str,
        timeout: Duration,
        max_tokens: u32,
    ) -> LlmResult<Vec<QuestionDraft>> {
        let provider = self
            .providers
            .first()
            .ok_or_else(|| LlmError::ConfigError("No LLM providers configured".to_string()))?;

        let request = GenerateRequest {
            prompt: syllabus.to_string(),
            max_tokens: Some(max_tokens),
            timeout,
        };

        let response = provider.generate(request).await?;
        tracing::info!(
            "{} generated a question set with {} in {}ms (tokens: {:?})",
            response.metadata.provider,
            response.metadata.model,
            response.metadata.latency_ms,
            response.metadata.tokens_used
        );

        parse_question_drafts(&response.text)
    }
}

/// Models wrap JSON in Markdown fences no matter how firmly told not to
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse and shape-check a model reply into question drafts
fn parse_question_drafts(raw: &str) -> LlmResult<Vec<QuestionDraft>> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(strip_code_fences(raw))
        .map_err(|_| LlmError::ParseError("AI returned invalid JSON".to_string()))?;

    if drafts.len() != GENERATED_QUESTION_COUNT {
        return Err(LlmError::ParseError(format!(
            "Expected exactly {} questions",
            GENERATED_QUESTION_COUNT
        )));
    }

    for draft in &drafts {
        draft.validate().map_err(LlmError::ParseError)?;
    }

    Ok(drafts)
}

/// Provider settings read from the environment
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// OpenAI credential; unset disables the provider
    pub openai_api_key: Option<String>,
    /// Chat model requested from OpenAI
    pub openai_model: String,
    /// Where the Ollama daemon listens; None disables it
    pub ollama_base_url: Option<String>,
    /// Model tag requested from Ollama
    pub ollama_model: String,
    /// Deadline applied to generation calls
    pub default_timeout: Duration,
    /// Token ceiling applied to generation calls
    pub default_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            ollama_base_url: Some("http://localhost:11434".to_string()),
            ollama_model: "llama3.2".to_string(),
            default_timeout: Duration::from_secs(30),
            default_max_tokens: 2000,
        }
    }
}

impl LlmConfig {
    /// Read settings from the process environment. Blank values count as
    /// unset, so an empty OLLAMA_BASE_URL switches Ollama off.
    pub fn from_env() -> Self {
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok().and_then(|key| {
            let trimmed = key.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        let openai_model = std::env::var("OPENAI_MODEL")
            .ok()
            .and_then(|model| {
                let trimmed = model.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| "gpt-4o-mini".to_string());

        let ollama_base_url = match std::env::var("OLLAMA_BASE_URL") {
            Ok(url) => {
                let trimmed = url.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Err(_) => Some("http://localhost:11434".to_string()),
        };

        let ollama_model = std::env::var("OLLAMA_MODEL")
            .ok()
            .and_then(|model| {
                let trimmed = model.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| "llama3.2".to_string());

        Self {
            openai_api_key,
            openai_model,
            ollama_base_url,
            ollama_model,
            default_timeout: std::env::var("LLM_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(30)),
            default_max_tokens: std::env::var("LLM_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2000),
        }
    }

    /// Build an LlmManager with all configured providers. OpenAI, when
    /// configured, comes first and thereby becomes the primary provider.
    pub fn build_manager(&self) -> LlmResult<LlmManager> {
        let mut providers: Vec<Box<dyn LlmProvider>> = Vec::new();

        if let Some(api_key) = &self.openai_api_key {
            providers.push(Box::new(OpenAiProvider::new(
                api_key.clone(),
                self.openai_model.clone(),
            )));
        }

        if let Some(base_url) = &self.ollama_base_url {
            providers.push(Box::new(OllamaProvider::new(
                base_url.clone(),
                self.ollama_model.clone(),
            )));
        }

        if providers.is_empty() {
            return Err(LlmError::ConfigError(
                "No LLM providers configured. Set OPENAI_API_KEY or OLLAMA_BASE_URL".to_string(),
            ));
        }

        Ok(LlmManager::new(providers))
    }
}
