//! Review generation: prompt assembly plus one LLM call.
//!
//! [`ReviewGenerator::generate`] never fails. A generation error is logged and
//! rendered into the text that ends up in the MR comment, so the requester
//! always sees an answer.

pub mod prompt;

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::LlmService;
use tracing::{info, warn};

use crate::git_providers::types::{ChangeSet, MrInfo};
pub use prompt::{PromptBuilder, PromptVariant, Section, build_prompt};

/// Prefix of the text returned when the model call fails.
pub const GENERATION_ERROR_PREFIX: &str = "코드 분석 중 오류가 발생했습니다";

/// Shared handle to the configured LLM backend.
#[derive(Debug, Clone)]
pub struct ReviewGenerator {
    llm: Arc<LlmService>,
}

impl ReviewGenerator {
    pub fn new(llm: LlmService) -> Self {
        Self { llm: Arc::new(llm) }
    }

    /// Builds the prompt for `variant` and asks the model for a review.
    pub async fn review(
        &self,
        changes: &ChangeSet,
        info: &MrInfo,
        instruction: Option<&str>,
        variant: PromptVariant,
    ) -> String {
        let prompt = build_prompt(changes, info, instruction, variant);
        self.generate(&prompt).await
    }

    /// Single completion call. Errors become `"{GENERATION_ERROR_PREFIX}: {e}"`.
    pub async fn generate(&self, prompt: &str) -> String {
        let t0 = Instant::now();
        match self.llm.generate(prompt).await {
            Ok(text) => {
                info!(
                    model = self.llm.model(),
                    prompt_chars = prompt.chars().count(),
                    reply_chars = text.chars().count(),
                    elapsed_ms = t0.elapsed().as_millis(),
                    "review: generation done"
                );
                text
            }
            Err(e) => {
                warn!(
                    model = self.llm.model(),
                    error = %e,
                    elapsed_ms = t0.elapsed().as_millis(),
                    "review: generation failed"
                );
                format!("{GENERATION_ERROR_PREFIX}: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ai_llm_service::{LlmModelConfig, LlmProvider};

    use super::*;

    fn generator(endpoint: String) -> ReviewGenerator {
        let svc = LlmService::new(LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint,
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        })
        .unwrap();
        ReviewGenerator::new(svc)
    }

    #[tokio::test]
    async fn returns_model_text_on_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":"LGTM, 다만 에러 처리 확인 필요","done":true}"#)
            .create_async()
            .await;

        let out = generator(server.url())
            .review(
                &ChangeSet::default(),
                &MrInfo::default(),
                None,
                PromptVariant::FullReview,
            )
            .await;
        assert_eq!(out, "LGTM, 다만 에러 처리 확인 필요");
    }

    #[tokio::test]
    async fn failure_becomes_error_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let out = generator(server.url()).generate("prompt").await;
        assert!(out.starts_with("코드 분석 중 오류가 발생했습니다: "), "{out}");
    }
}
