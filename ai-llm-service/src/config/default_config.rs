//! LLM config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_PROVIDER`     = `gemini` (default), `openai` or `ollama`
//! - `LLM_MODEL`        = model identifier (provider default if unset)
//! - `LLM_ENDPOINT`     = API base URL (provider default if unset)
//! - `GEMINI_API_KEY`   = required when the provider is Gemini
//! - `OPENAI_API_KEY`   = required when the provider is OpenAI
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = request timeout, default 60

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, EnvLookup, must_var, opt_u32, opt_u64, opt_var, process_env,
        validate_http_endpoint,
    },
};

/// Default generation timeout when `LLM_TIMEOUT_SECS` is unset.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Builds the generation config from the process environment.
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_from_vars(&process_env)
}

/// Builds the generation config from an arbitrary variable lookup.
///
/// # Errors
///
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::MissingVar`] if the provider's API key is absent
/// - [`ConfigError::InvalidFormat`] if `LLM_ENDPOINT` is not http(s)
/// - [`ConfigError::InvalidNumber`] for malformed numeric variables or a zero
///   `LLM_TIMEOUT_SECS`
pub fn config_from_vars(lookup: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = match opt_var(lookup, "LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::default(),
    };

    let model = opt_var(lookup, "LLM_MODEL").unwrap_or_else(|| provider.default_model().into());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let endpoint =
        opt_var(lookup, "LLM_ENDPOINT").unwrap_or_else(|| provider.default_endpoint().into());
    validate_http_endpoint("LLM_ENDPOINT", &endpoint)?;

    let api_key = match provider.api_key_var() {
        Some(var) => Some(must_var(lookup, var)?),
        None => None,
    };

    let timeout_secs = opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidNumber {
            var: "LLM_TIMEOUT_SECS",
            reason: "must be greater than zero",
        }
        .into());
    }

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: opt_u32(lookup, "LLM_MAX_TOKENS")?,
        temperature: Some(0.4),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}
