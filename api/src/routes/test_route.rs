use axum::http::Method;
use tracing::debug;

use crate::core::http::response_envelope::WebhookResponse;

/// GET|POST /test
///
/// Liveness probe that echoes the request method.
pub async fn test_route(method: Method) -> WebhookResponse {
    debug!(%method, "test endpoint hit");
    WebhookResponse::success("Test endpoint is working").with_method(method.as_str())
}
