//! Inquiry status workflow.
//!
//! ```text
//! pending ──reply──▶ answered ──▶ closed
//!    └──────────────────────────────▲
//! ```
//!
//! All transitions are operator-triggered; submission always creates
//! `pending`. Closing straight from `pending` ("resolved without a written
//! response") is allowed on purpose, and no transition is refused because
//! `answered` was skipped. What is refused is leaving `closed` or going back
//! to `pending`.

use crate::error::CoreError;
use crate::inquiry::{validate_status, STATUS_ANSWERED, STATUS_CLOSED, STATUS_PENDING};

/// Returns the set of statuses that `from_status` may move to, itself
/// included (re-applying the current status is a no-op).
///
/// - `pending`  -> `pending`, `answered`, `closed`
/// - `answered` -> `answered`, `closed`
/// - `closed`   -> `closed`
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_PENDING, STATUS_ANSWERED, STATUS_CLOSED],
        STATUS_ANSWERED => &[STATUS_ANSWERED, STATUS_CLOSED],
        STATUS_CLOSED => &[STATUS_CLOSED],
        _ => &[],
    }
}

/// Validate a status change requested through the status operation.
///
/// `has_reply` is whether the record already carries an operator reply;
/// `answered` without one would break the reply/status pairing, so that
/// case must go through [`plan_reply`] instead.
pub fn validate_transition(current: &str, next: &str, has_reply: bool) -> Result<(), CoreError> {
    validate_status(next)?;

    let allowed = valid_transitions(current);
    if !allowed.contains(&next) {
        return Err(CoreError::Conflict(format!(
            "Cannot move inquiry from '{current}' to '{next}'. Allowed: {allowed:?}"
        )));
    }
    if next == STATUS_ANSWERED && !has_reply {
        return Err(CoreError::Conflict(
            "An inquiry can only be marked answered by replying to it".into(),
        ));
    }
    Ok(())
}

/// Outcome of asking to reply to an inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPlan {
    /// Write reply, reply timestamp, and `answered` in one update.
    Apply,
    /// The record already holds this exact reply and is answered.
    Unchanged,
}

/// Decide how to apply `reply` to a record in `current` status.
pub fn plan_reply(
    current: &str,
    existing_reply: Option<&str>,
    reply: &str,
) -> Result<ReplyPlan, CoreError> {
    match current {
        STATUS_CLOSED => Err(CoreError::Conflict(
            "Closed inquiries cannot be answered".into(),
        )),
        STATUS_ANSWERED if existing_reply == Some(reply) => Ok(ReplyPlan::Unchanged),
        STATUS_PENDING | STATUS_ANSWERED => Ok(ReplyPlan::Apply),
        other => Err(CoreError::Internal(format!(
            "Inquiry has unknown status '{other}'"
        ))),
    }
}
