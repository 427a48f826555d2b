//! Comment command extraction.
//!
//! Decides from a note body whether a review was requested and what the user
//! asked for. Pure function, runs synchronously in the webhook handler.

use crate::publish::BOT_SIGNATURE;

/// Explicit triggers in priority order; matched ASCII case-insensitively.
pub const EXPLICIT_TRIGGERS: [&str; 3] = ["@bot", "/review", "/analyze"];

/// Natural-language triggers; the whole body becomes the instruction.
pub const NATURAL_TRIGGERS: [&str; 3] = ["코드리뷰", "코드 리뷰", "리뷰"];

/// Result of scanning one comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The body carries the bot signature; never react to our own output.
    SelfAuthored,
    /// Nothing in the body asks for a review.
    NoTrigger,
    /// A review was requested. `instruction` may be empty.
    Review {
        trigger: &'static str,
        instruction: String,
    },
}

/// Scans `body` for a review request.
///
/// 1. signature present → [`CommandOutcome::SelfAuthored`]
/// 2. first explicit trigger (by priority) → text after its first occurrence
/// 3. any natural-language trigger → the whole trimmed body
/// 4. otherwise [`CommandOutcome::NoTrigger`]
pub fn extract_command(body: &str) -> CommandOutcome {
    if body.contains(BOT_SIGNATURE) {
        return CommandOutcome::SelfAuthored;
    }

    // ASCII lowering keeps byte offsets valid for slicing the original body.
    let lowered = body.to_ascii_lowercase();
    for trigger in EXPLICIT_TRIGGERS {
        if let Some(idx) = lowered.find(trigger) {
            return CommandOutcome::Review {
                trigger,
                instruction: body[idx + trigger.len()..].trim().to_string(),
            };
        }
    }

    for trigger in NATURAL_TRIGGERS {
        if body.contains(trigger) {
            return CommandOutcome::Review {
                trigger,
                instruction: body.trim().to_string(),
            };
        }
    }

    CommandOutcome::NoTrigger
}
