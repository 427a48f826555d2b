//! Public entry for the mr-reviewer pipeline.
//!
//! Two flows, each run inside one background task per webhook delivery:
//!
//! 1) **Full review** (MR opened/updated)
//!    - Fetch the MR diff; on failure log and stop, nothing is posted
//!    - Prompt with metadata taken from the webhook payload
//!    - Post a signed review note
//!
//! 2) **Requested review** (a note asked for it)
//!    - Resolve the MR iid (payload first, then the MR listing)
//!    - Fetch the diff; on failure post one signed explanation and stop
//!    - Fetch metadata, prompt with the user's instruction
//!    - Post a signed note attributed to the requester
//!
//! Nothing here returns an error: every outbound call already degrades to a
//! sentinel, and the outcome enum tells the caller what happened.

pub mod command;
pub mod errors;
pub mod git_providers;
pub mod lang;
pub mod publish;
pub mod review;

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use git_providers::{GitLabClient, MergeRequestRef, MrInfo};
use publish::ReviewComment;
use review::{PromptVariant, ReviewGenerator};

/// Immutable dependencies shared by all review tasks.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    pub gitlab: GitLabClient,
    pub generator: ReviewGenerator,
}

/// How a pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Review generated and the note was accepted by GitLab.
    Posted,
    /// Review generated but GitLab rejected the note.
    PostFailed,
    /// Diff unavailable on the full-review path; nothing posted.
    ChangesUnavailable,
    /// Diff unavailable on the requested path; explanation note attempted.
    FallbackSent { posted: bool },
    /// The note could not be mapped to an MR iid.
    Unresolved,
}

/// Identifiers a note event carries about its merge request.
///
/// Any of the three MR fields may be missing depending on the GitLab version
/// and hook configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteTarget {
    pub project_id: u64,
    /// `object_attributes.noteable_iid`
    pub noteable_iid: Option<u64>,
    /// `merge_request.iid`
    pub merge_request_iid: Option<u64>,
    /// `object_attributes.noteable_id` (instance-wide MR id)
    pub noteable_id: Option<u64>,
}

/// Full review of an opened/updated MR.
///
/// `info` comes from the webhook payload; no metadata call is made.
#[instrument(skip_all, fields(mr = %mr))]
pub async fn run_full_review(ctx: &ReviewContext, mr: MergeRequestRef, info: MrInfo) -> ReviewOutcome {
    let t0 = Instant::now();

    let Some(changes) = ctx.gitlab.fetch_changes(mr).await else {
        warn!("full review: changes unavailable, skipping");
        return ReviewOutcome::ChangesUnavailable;
    };

    let analysis = ctx
        .generator
        .review(&changes, &info, None, PromptVariant::FullReview)
        .await;

    let outcome = post(ctx, mr, ReviewComment::Full { analysis }).await;
    info!(?outcome, elapsed_ms = t0.elapsed().as_millis(), "full review finished");
    outcome
}

/// Review requested from a comment.
#[instrument(
    skip_all,
    fields(project_id = target.project_id, requester = requester.as_deref().unwrap_or("-"))
)]
pub async fn run_requested_review(
    ctx: &ReviewContext,
    target: NoteTarget,
    instruction: String,
    requester: Option<String>,
) -> ReviewOutcome {
    let t0 = Instant::now();

    let Some(mr) = resolve_merge_request(&ctx.gitlab, target).await else {
        warn!(?target, "requested review: merge request iid unresolved");
        return ReviewOutcome::Unresolved;
    };

    let Some(changes) = ctx.gitlab.fetch_changes(mr).await else {
        warn!(%mr, "requested review: changes unavailable, posting explanation");
        let posted = publish::publish(&ctx.gitlab, mr, &ReviewComment::FetchFailed).await;
        return ReviewOutcome::FallbackSent { posted };
    };

    let info = ctx.gitlab.fetch_mr_metadata(mr).await;
    let analysis = ctx
        .generator
        .review(
            &changes,
            &info,
            Some(instruction.as_str()),
            PromptVariant::TargetedComment,
        )
        .await;

    let outcome = post(
        ctx,
        mr,
        ReviewComment::Requested {
            analysis,
            requester,
        },
    )
    .await;
    info!(%mr, ?outcome, elapsed_ms = t0.elapsed().as_millis(), "requested review finished");
    outcome
}

/// Resolves the MR a note belongs to.
///
/// Order: `noteable_iid`, then `merge_request.iid`, then a listing lookup
/// matching `id == noteable_id`.
pub async fn resolve_merge_request(gitlab: &GitLabClient, target: NoteTarget) -> Option<MergeRequestRef> {
    let project_id = target.project_id;
    if let Some(mr_iid) = target.noteable_iid.or(target.merge_request_iid) {
        return Some(MergeRequestRef { project_id, mr_iid });
    }

    let noteable_id = target.noteable_id?;
    debug!(project_id, noteable_id, "resolving iid via merge request listing");
    let found = gitlab
        .list_merge_requests(project_id)
        .await?
        .into_iter()
        .find(|m| m.id == noteable_id)?;

    Some(MergeRequestRef {
        project_id,
        mr_iid: found.iid,
    })
}

async fn post(ctx: &ReviewContext, mr: MergeRequestRef, comment: ReviewComment) -> ReviewOutcome {
    if publish::publish(&ctx.gitlab, mr, &comment).await {
        ReviewOutcome::Posted
    } else {
        ReviewOutcome::PostFailed
    }
}
