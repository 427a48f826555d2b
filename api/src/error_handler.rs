use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::core::{app_config::ConfigError, http::response_envelope::WebhookResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    GitLab(#[from] mr_reviewer::errors::Error),

    #[error(transparent)]
    Llm(#[from] ai_llm_service::AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("invalid JSON")]
    InvalidJson(#[source] serde_json::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            // startup-only
            AppError::Config(_)
            | AppError::GitLab(_)
            | AppError::Llm(_)
            | AppError::Bind { .. }
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = WebhookResponse::error(self.to_string());
        if status.is_server_error() {
            body.message = "internal error".into();
        }
        (status, axum::Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
