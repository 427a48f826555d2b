//! GitLab provider access.
//!
//! [`ProviderConfig`] is built once at startup; [`gitlab::GitLabClient`] is
//! constructed from it and shared by every review task.

pub mod gitlab;
pub mod types;

pub use gitlab::GitLabClient;
pub use types::*;

use std::time::Duration;

/// Default timeout applied to every outbound GitLab request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration for the GitLab client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Instance URL, e.g. "https://gitlab.com" (the `/api/v4` suffix is added).
    pub base_url: String,
    /// Private access token sent as `PRIVATE-TOKEN`.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ProviderConfig {
    /// REST base, e.g. "https://gitlab.com/api/v4".
    pub fn api_base(&self) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        if base.ends_with("/api/v4") {
            base.to_string()
        } else {
            format!("{base}/api/v4")
        }
    }
}
