//! Shared LLM service used by the review bot.
//!
//! - [`config`] describes a model invocation (provider, model, endpoint, key).
//! - [`services`] holds one thin HTTP client per provider.
//! - [`llm_service::LlmService`] picks the client once from config and exposes
//!   a single `generate` call.
//! - [`telemetry`] installs the process-wide `tracing` subscriber.

pub mod config;
pub mod error_handler;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
pub use llm_service::LlmService;
