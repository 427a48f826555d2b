use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Value of the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Accepted,
    Ignored,
    Error,
}

/// Body of every endpoint: `{status, message}` plus `method` on `/test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: ResponseStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    pub message: String,
}

impl WebhookResponse {
    pub fn new(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            method: None,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Success, message)
    }

    /// Work was scheduled; pairs with `202 Accepted`.
    pub fn accepted(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Accepted, message)
    }

    /// Delivery understood but nothing to do; pairs with `200 OK`.
    pub fn ignored(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Ignored, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::Error, message)
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Status code implied by [`ResponseStatus`].
    pub fn status_code(&self) -> StatusCode {
        match self.status {
            ResponseStatus::Success | ResponseStatus::Ignored => StatusCode::OK,
            ResponseStatus::Accepted => StatusCode::ACCEPTED,
            ResponseStatus::Error => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_method_by_default() {
        let v = serde_json::to_value(WebhookResponse::ignored("skip")).unwrap();
        assert_eq!(v, serde_json::json!({"status": "ignored", "message": "skip"}));
    }

    #[test]
    fn codes_follow_status() {
        assert_eq!(WebhookResponse::accepted("x").status_code(), StatusCode::ACCEPTED);
        assert_eq!(WebhookResponse::ignored("x").status_code(), StatusCode::OK);
        assert_eq!(WebhookResponse::error("x").status_code(), StatusCode::BAD_REQUEST);
    }
}
