//! Comment publisher.
//!
//! Every body produced here embeds [`BOT_SIGNATURE`]; the command extractor
//! relies on it to ignore the bot's own notes.

use std::time::Instant;

use tracing::{info, warn};

use crate::git_providers::{GitLabClient, types::MergeRequestRef};

/// Marker present in every comment the bot writes.
pub const BOT_SIGNATURE: &str = "🤖 AI 코드 리뷰";

const PROJECT_LINK: &str = "[Git](https://github.com/PMRAZOR/Gitlab-MR-Review-Bot)";

/// Text posted when the diff could not be fetched for a requested review.
pub const FETCH_FAILED_TEXT: &str = "변경 사항을 가져올 수 없어 코드 리뷰를 수행할 수 없습니다.";

/// A comment ready to be rendered and posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewComment {
    /// Automatic review of an opened/updated MR.
    Full { analysis: String },
    /// Review requested from a note; `requester` is the GitLab username if known.
    Requested {
        analysis: String,
        requester: Option<String>,
    },
    /// The diff was unavailable; explains why no review follows.
    FetchFailed,
}

impl ReviewComment {
    /// Markdown body as posted to GitLab.
    pub fn render(&self) -> String {
        match self {
            ReviewComment::Full { analysis } => format!(
                "## {BOT_SIGNATURE}\n\n{analysis}\n\n---\n*이 리뷰는 자동으로 생성되었습니다. {PROJECT_LINK}*\n"
            ),
            ReviewComment::Requested {
                analysis,
                requester,
            } => {
                let by = match requester {
                    Some(name) => format!("@{name}님의"),
                    None => "사용자".to_string(),
                };
                format!(
                    "## {BOT_SIGNATURE} - 사용자 요청\n\n{analysis}\n\n---\n*이 리뷰는 {by} 요청에 의해 생성되었습니다. {PROJECT_LINK}*\n"
                )
            }
            ReviewComment::FetchFailed => {
                format!("## {BOT_SIGNATURE}\n\n{FETCH_FAILED_TEXT}\n")
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ReviewComment::Full { .. } => "full",
            ReviewComment::Requested { .. } => "requested",
            ReviewComment::FetchFailed => "fetch_failed",
        }
    }
}

/// Posts `comment` as an MR note. Returns whether GitLab accepted it.
pub async fn publish(client: &GitLabClient, mr: MergeRequestRef, comment: &ReviewComment) -> bool {
    let t0 = Instant::now();
    let body = comment.render();
    let ok = client.post_comment(mr, &body).await;
    if ok {
        info!(%mr, kind = comment.kind(), elapsed_ms = t0.elapsed().as_millis(), "publish: comment posted");
    } else {
        warn!(%mr, kind = comment.kind(), "publish: comment was not posted");
    }
    ok
}
