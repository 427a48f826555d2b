//! Process configuration, read once at startup.
//!
//! Values come from the environment (optionally seeded from `.env`). Parsing
//! goes through an [`EnvLookup`] so tests can feed a plain map.

use std::time::Duration;

use ai_llm_service::{
    LlmModelConfig, config::default_config::config_from_vars,
    error_handler::{EnvLookup, must_var, opt_u16, opt_u64, opt_var, process_env, validate_http_endpoint},
};
use mr_reviewer::git_providers::{DEFAULT_REQUEST_TIMEOUT, ProviderConfig};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] ai_llm_service::AiLlmError),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gitlab: ProviderConfig,
    pub llm: LlmModelConfig,
    /// Upper bound on concurrently running review tasks.
    pub max_concurrency: usize,
    /// How long shutdown waits for in-flight reviews.
    pub shutdown_grace: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&process_env)
    }

    pub fn from_vars(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let base_url = opt_var(lookup, "GITLAB_URL").unwrap_or_else(|| DEFAULT_GITLAB_URL.into());
        validate_http_endpoint("GITLAB_URL", &base_url)?;

        let timeout = opt_u64(lookup, "GITLAB_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::Zero("GITLAB_TIMEOUT_SECS"));
        }

        let gitlab = ProviderConfig {
            base_url,
            token: must_var(lookup, "GITLAB_TOKEN")?,
            timeout,
        };

        let max_concurrency = opt_u64(lookup, "REVIEW_MAX_CONCURRENCY")?
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(ConfigError::Zero("REVIEW_MAX_CONCURRENCY"));
        }

        Ok(Self {
            host: opt_var(lookup, "API_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port: opt_u16(lookup, "PORT")?.unwrap_or(DEFAULT_PORT),
            gitlab,
            llm: config_from_vars(lookup)?,
            max_concurrency,
            shutdown_grace: opt_u64(lookup, "SHUTDOWN_GRACE_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_SHUTDOWN_GRACE),
        })
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ai_llm_service::{AiLlmError, LlmProvider, error_handler::ConfigError as EnvError};

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(&move |k: &str| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[("GITLAB_TOKEN", "glpat-x"), ("GEMINI_API_KEY", "g-key")]).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.gitlab.api_base(), "https://gitlab.com/api/v4");
        assert_eq!(cfg.gitlab.timeout, Duration::from_secs(10));
        assert_eq!(cfg.llm.provider, LlmProvider::Gemini);
        assert_eq!(cfg.max_concurrency, 4);
        assert_eq!(cfg.shutdown_grace, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_read() {
        let cfg = load(&[
            ("GITLAB_TOKEN", "glpat-x"),
            ("GITLAB_URL", "https://git.internal"),
            ("GITLAB_TIMEOUT_SECS", "3"),
            ("LLM_PROVIDER", "ollama"),
            ("PORT", "8080"),
            ("REVIEW_MAX_CONCURRENCY", "1"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.gitlab.timeout, Duration::from_secs(3));
        assert_eq!(cfg.gitlab.api_base(), "https://git.internal/api/v4");
        assert_eq!(cfg.llm.provider, LlmProvider::Ollama);
        assert_eq!(cfg.max_concurrency, 1);
    }

    #[test]
    fn token_is_required() {
        let err = load(&[("LLM_PROVIDER", "ollama")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Env(AiLlmError::Config(EnvError::MissingVar("GITLAB_TOKEN")))
        ));
    }

    #[test]
    fn bad_numbers_fail() {
        let err = load(&[
            ("GITLAB_TOKEN", "t"),
            ("LLM_PROVIDER", "ollama"),
            ("PORT", "not-a-port"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = load(&[
            ("GITLAB_TOKEN", "t"),
            ("LLM_PROVIDER", "ollama"),
            ("REVIEW_MAX_CONCURRENCY", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Zero("REVIEW_MAX_CONCURRENCY")));
    }

    #[test]
    fn zero_timeouts_fail() {
        let err = load(&[
            ("GITLAB_TOKEN", "t"),
            ("LLM_PROVIDER", "ollama"),
            ("GITLAB_TIMEOUT_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Zero("GITLAB_TIMEOUT_SECS")));

        let err = load(&[
            ("GITLAB_TOKEN", "t"),
            ("LLM_PROVIDER", "ollama"),
            ("LLM_TIMEOUT_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Env(AiLlmError::Config(EnvError::InvalidNumber {
                var: "LLM_TIMEOUT_SECS",
                ..
            }))
        ));
    }
}
