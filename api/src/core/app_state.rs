use std::time::Duration;

use ai_llm_service::LlmService;
use mr_reviewer::{ReviewContext, git_providers::GitLabClient, review::ReviewGenerator};

use crate::core::{app_config::AppConfig, worker::ReviewWorker};
use crate::error_handler::AppResult;

/// Shared state for all HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Clients used by review tasks.
    pub review: ReviewContext,
    /// Runs review tasks in the background.
    pub worker: ReviewWorker,
    /// Drain timeout applied on shutdown.
    pub shutdown_grace: Duration,
}

impl AppState {
    /// Builds the GitLab client, the LLM backend and the worker from `config`.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let gitlab = GitLabClient::new(&config.gitlab)?;
        let llm = LlmService::new(config.llm.clone())?;
        Ok(Self::from_parts(
            ReviewContext {
                gitlab,
                generator: ReviewGenerator::new(llm),
            },
            ReviewWorker::new(config.max_concurrency),
            config.shutdown_grace,
        ))
    }

    pub fn from_parts(review: ReviewContext, worker: ReviewWorker, shutdown_grace: Duration) -> Self {
        Self {
            review,
            worker,
            shutdown_grace,
        }
    }
}
