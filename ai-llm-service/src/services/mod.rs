pub mod gemini_service;
pub mod ollama_service;
pub mod open_ai_service;

use std::time::Duration;

use crate::config::llm_model_config::LlmModelConfig;

/// Request timeout derived from config (60 s when unset).
pub(crate) fn request_timeout(cfg: &LlmModelConfig) -> Duration {
    cfg.timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(60))
}
