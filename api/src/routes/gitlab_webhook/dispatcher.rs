//! Decides what to do with a classified delivery.
//!
//! Runs inside the request handler and never waits on GitLab or the model:
//! review work is handed to the [`ReviewWorker`](crate::core::worker::ReviewWorker)
//! and the reply is returned right away.

use mr_reviewer::{
    command::{CommandOutcome, extract_command},
    run_full_review, run_requested_review,
};
use tracing::{debug, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::WebhookResponse},
    routes::gitlab_webhook::webhook_event::{MergeRequestEvent, NoteEvent, WebhookEvent},
};

pub const MR_ACCEPTED: &str = "MR 요청이 접수되었습니다. 백그라운드에서 처리됩니다.";
pub const NOTE_ACCEPTED: &str = "노트 요청이 접수되었습니다. 백그라운드에서 처리됩니다.";

/// Routes one event; schedules at most one background task.
pub fn dispatch(state: &AppState, event: WebhookEvent) -> WebhookResponse {
    match event {
        WebhookEvent::MergeRequest(ev) => dispatch_merge_request(state, ev),
        WebhookEvent::Note(ev) => dispatch_note(state, ev),
        WebhookEvent::Other(kind) => {
            info!(%kind, "ignoring unsupported event");
            WebhookResponse::ignored(format!("unsupported event type: {kind}"))
        }
    }
}

fn dispatch_merge_request(state: &AppState, ev: MergeRequestEvent) -> WebhookResponse {
    let action = ev.action.as_deref().unwrap_or("none");
    if !ev.is_reviewed_action() {
        info!(action, "merge request action not reviewed");
        return WebhookResponse::ignored(format!("merge request action not handled: {action}"));
    }
    let Some(mr) = ev.mr else {
        info!(action, "merge request event without project id or iid");
        return WebhookResponse::ignored("merge request reference missing");
    };

    info!(%mr, action, "scheduling full review");
    let ctx = state.review.clone();
    let info = ev.info;
    state.worker.spawn("full_review", async move {
        run_full_review(&ctx, mr, info).await;
    });
    WebhookResponse::accepted(MR_ACCEPTED)
}

fn dispatch_note(state: &AppState, ev: NoteEvent) -> WebhookResponse {
    if !ev.on_merge_request() {
        let noteable = ev.noteable_type.as_deref().unwrap_or("unknown");
        info!(noteable, "note not on a merge request");
        return WebhookResponse::ignored(format!("note on {noteable} is not handled"));
    }
    let Some(target) = ev.target else {
        info!("note event without project id");
        return WebhookResponse::ignored("project id missing");
    };

    let instruction = match extract_command(&ev.body) {
        CommandOutcome::Review {
            trigger,
            instruction,
        } => {
            debug!(trigger, instruction = %instruction, "review command found");
            instruction
        }
        CommandOutcome::SelfAuthored => {
            debug!("note written by the bot, skipping");
            return WebhookResponse::ignored("bot comment");
        }
        CommandOutcome::NoTrigger => {
            let preview: String = ev.body.chars().take(50).collect();
            debug!(%preview, "no review command in note");
            return WebhookResponse::ignored("no review command");
        }
    };

    info!(
        project_id = target.project_id,
        requester = ev.requester.as_deref().unwrap_or("-"),
        "scheduling requested review"
    );
    let ctx = state.review.clone();
    let requester = ev.requester;
    state.worker.spawn("requested_review", async move {
        run_requested_review(&ctx, target, instruction, requester).await;
    });
    WebhookResponse::accepted(NOTE_ACCEPTED)
}
