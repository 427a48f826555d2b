//! GitLab webhook intake: payload model, classification and dispatch.

pub mod dispatcher;
pub mod gitlab_webhook_route;
pub mod webhook_event;
