//! Inbound GitLab webhook payloads.
//!
//! Only the fields the bot reads are modelled; everything is optional because
//! GitLab omits keys depending on event type and version.

use mr_reviewer::{
    NoteTarget,
    git_providers::{MergeRequestRef, MrInfo},
};
use serde::Deserialize;

/// `noteable_type` of notes left on merge requests.
pub const NOTEABLE_MERGE_REQUEST: &str = "MergeRequest";

/// MR actions that trigger a full review.
pub const REVIEWED_ACTIONS: [&str; 2] = ["open", "update"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object_kind: Option<String>,
    #[serde(default)]
    pub object_attributes: Option<ObjectAttributes>,
    #[serde(default)]
    pub project: Option<ProjectAttrs>,
    #[serde(default)]
    pub user: Option<UserAttrs>,
    #[serde(default)]
    pub merge_request: Option<NestedMergeRequest>,
}

/// Union of the `object_attributes` fields used by MR and note events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectAttributes {
    // merge_request
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub iid: Option<u64>,
    #[serde(default)]
    pub target_project_id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    // note
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub noteable_type: Option<String>,
    #[serde(default)]
    pub noteable_id: Option<u64>,
    #[serde(default)]
    pub noteable_iid: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectAttrs {
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAttrs {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NestedMergeRequest {
    #[serde(default)]
    pub iid: Option<u64>,
}

/// A merge request open/update/close/... event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestEvent {
    pub action: Option<String>,
    /// `None` when `target_project_id` or `iid` is missing.
    pub mr: Option<MergeRequestRef>,
    pub info: MrInfo,
}

impl MergeRequestEvent {
    pub fn is_reviewed_action(&self) -> bool {
        self.action
            .as_deref()
            .is_some_and(|a| REVIEWED_ACTIONS.contains(&a))
    }
}

/// A comment event on any noteable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    pub noteable_type: Option<String>,
    pub body: String,
    /// `None` when `project.id` is missing.
    pub target: Option<NoteTarget>,
    /// `user.username`; `None` when absent or blank.
    pub requester: Option<String>,
}

impl NoteEvent {
    pub fn on_merge_request(&self) -> bool {
        self.noteable_type.as_deref() == Some(NOTEABLE_MERGE_REQUEST)
    }
}

/// Classified delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    MergeRequest(MergeRequestEvent),
    Note(NoteEvent),
    /// Any other `object_kind` (or none at all).
    Other(String),
}

impl WebhookEvent {
    pub fn kind(&self) -> &str {
        match self {
            WebhookEvent::MergeRequest(_) => "merge_request",
            WebhookEvent::Note(_) => "note",
            WebhookEvent::Other(k) => k,
        }
    }
}

impl From<WebhookPayload> for WebhookEvent {
    fn from(p: WebhookPayload) -> Self {
        let attrs = p.object_attributes.unwrap_or_default();
        match p.object_kind.as_deref() {
            Some("merge_request") => {
                let mr = match (attrs.target_project_id, attrs.iid) {
                    (Some(project_id), Some(mr_iid)) => Some(MergeRequestRef { project_id, mr_iid }),
                    _ => None,
                };
                WebhookEvent::MergeRequest(MergeRequestEvent {
                    action: attrs.action,
                    mr,
                    info: MrInfo::from_parts(attrs.title, attrs.description),
                })
            }
            Some("note") => {
                let target = p.project.and_then(|pr| pr.id).map(|project_id| NoteTarget {
                    project_id,
                    noteable_iid: attrs.noteable_iid,
                    merge_request_iid: p.merge_request.and_then(|m| m.iid),
                    noteable_id: attrs.noteable_id,
                });
                WebhookEvent::Note(NoteEvent {
                    noteable_type: attrs.noteable_type,
                    body: attrs.note.unwrap_or_default(),
                    target,
                    requester: p
                        .user
                        .and_then(|u| u.username)
                        .map(|u| u.trim().to_string())
                        .filter(|u| !u.is_empty()),
                })
            }
            other => WebhookEvent::Other(other.unwrap_or("unknown").to_string()),
        }
    }
}
