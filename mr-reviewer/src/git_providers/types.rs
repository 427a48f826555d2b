//! Data model for merge requests and their diffs.
//!
//! Everything here is request-scoped: built while handling one webhook
//! delivery and dropped afterwards.

use serde::{Deserialize, Serialize};

/// Placeholder used when an MR title is unavailable.
pub const TITLE_PLACEHOLDER: &str = "제목 없음";
/// Placeholder used when an MR description is unavailable.
pub const DESCRIPTION_PLACEHOLDER: &str = "설명 없음";

/// Natural key of a merge request for every downstream API call.
///
/// * `project_id` – numeric GitLab project ID.
/// * `mr_iid`     – project-scoped MR number (what users see as `!42`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRequestRef {
    pub project_id: u64,
    pub mr_iid: u64,
}

impl std::fmt::Display for MergeRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}", self.project_id, self.mr_iid)
    }
}

/// MR metadata used for prompt construction only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrInfo {
    pub title: String,
    pub description: String,
}

impl Default for MrInfo {
    fn default() -> Self {
        Self {
            title: TITLE_PLACEHOLDER.to_string(),
            description: DESCRIPTION_PLACEHOLDER.to_string(),
        }
    }
}

impl MrInfo {
    /// Builds metadata from optional fields, substituting placeholders for
    /// missing values.
    pub fn from_parts(title: Option<String>, description: Option<String>) -> Self {
        Self {
            title: title.unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
            description: description.unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        }
    }
}

/// One changed file as returned by the `/changes` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    #[serde(default)]
    pub old_path: Option<String>,
    #[serde(default)]
    pub new_path: Option<String>,
    /// Raw unified diff text for this file.
    #[serde(default)]
    pub diff: Option<String>,
}

impl FileChange {
    /// Display path: `new_path`, falling back to `old_path`.
    pub fn path(&self) -> Option<&str> {
        self.new_path.as_deref().or(self.old_path.as_deref())
    }
}

/// Ordered per-file changes of one MR, verbatim from the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default)]
    pub changes: Vec<FileChange>,
}

/// Minimal MR listing entry used to map an internal `id` to its `iid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestSummary {
    pub id: u64,
    pub iid: u64,
}
