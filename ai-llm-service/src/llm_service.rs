//! Shared generation service.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - The concrete provider client is chosen from config and built once, so the
//!   underlying HTTP connection pool is reused across reviews.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{
        gemini_service::GeminiService, ollama_service::OllamaService,
        open_ai_service::OpenAiService,
    },
};

/// Provider client (enum-dispatch, no boxed futures).
#[derive(Debug)]
enum Backend {
    Gemini(GeminiService),
    OpenAI(OpenAiService),
    Ollama(OllamaService),
}

/// Single-profile text-generation service.
#[derive(Debug)]
pub struct LlmService {
    backend: Backend,
    model: String,
}

impl LlmService {
    /// Builds the provider client described by `cfg`.
    ///
    /// # Errors
    /// Propagates provider validation errors (missing key, bad endpoint) and
    /// HTTP client construction failures.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let model = cfg.model.clone();
        let backend = match cfg.provider {
            LlmProvider::Gemini => Backend::Gemini(GeminiService::new(cfg)?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAiService::new(cfg)?),
            LlmProvider::Ollama => Backend::Ollama(OllamaService::new(cfg)?),
        };
        Ok(Self { backend, model })
    }

    /// Model identifier this service sends requests to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates text for a single-turn prompt.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        match &self.backend {
            Backend::Gemini(c) => c.generate(prompt).await,
            Backend::OpenAI(c) => c.generate(prompt).await,
            Backend::Ollama(c) => c.generate(prompt).await,
        }
    }
}
