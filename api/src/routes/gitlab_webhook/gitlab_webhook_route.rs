use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::WebhookResponse},
    error_handler::AppError,
    routes::gitlab_webhook::{
        dispatcher::dispatch,
        webhook_event::{WebhookEvent, WebhookPayload},
    },
};

const PREVIEW_CHARS: usize = 500;

/// GET /webhook/gitlab
pub async fn gitlab_webhook_probe() -> WebhookResponse {
    WebhookResponse::success("Webhook endpoint is active")
}

/// POST /webhook/gitlab
///
/// Accepts GitLab merge request and note hooks. Replies `202` when a review
/// was scheduled, `200 ignored` otherwise, and `400` for bodies that are not
/// JSON. Review work continues after the reply.
#[instrument(name = "gitlab_webhook", skip_all, fields(event = tracing::field::Empty))]
pub async fn gitlab_webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event_header = headers
        .get("X-Gitlab-Event")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown");
    tracing::Span::current().record("event", event_header);

    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            info!(error = %e, "webhook body is not valid JSON");
            return AppError::InvalidJson(e).into_response();
        }
    };
    debug!(preview = %preview(&body), "webhook payload");

    let event = match serde_json::from_value::<WebhookPayload>(value) {
        Ok(p) => WebhookEvent::from(p),
        Err(e) => {
            info!(error = %e, "webhook payload has an unexpected shape");
            return WebhookResponse::ignored("unrecognized payload").into_response();
        }
    };
    info!(kind = event.kind(), "webhook received");

    dispatch(&state, event).into_response()
}

fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
