//! Moderation actions
//!
//! State transitions on comments and accounts, with authorization and the
//! audit trail. Read-only decisions live in [`crate::policy`].

mod service;

pub use service::ModerationService;

use crate::queue::QueueViewState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A moderator action offered in the queue and on thread pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Hide,
    MarkReviewed,
    BanAuthor,
}

impl ModerationAction {
    pub const ALL: [ModerationAction; 3] = [
        ModerationAction::Hide,
        ModerationAction::MarkReviewed,
        ModerationAction::BanAuthor,
    ];

    /// Last segment of the action endpoint, `/moderation/comments/:id/<segment>`
    pub fn path_segment(&self) -> &'static str {
        match self {
            ModerationAction::Hide => "hide",
            ModerationAction::MarkReviewed => "review",
            ModerationAction::BanAuthor => "ban_author",
        }
    }

    /// Link text
    pub fn label(&self) -> &'static str {
        match self {
            ModerationAction::Hide => "Hide",
            ModerationAction::MarkReviewed => "Mark as reviewed",
            ModerationAction::BanAuthor => "Ban author",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "hide" => Some(ModerationAction::Hide),
            "review" | "mark_reviewed" => Some(ModerationAction::MarkReviewed),
            "ban" | "ban_author" => Some(ModerationAction::BanAuthor),
            _ => None,
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Result of an action that succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// State changed
    Applied,
    /// Target was already in the requested state
    Unchanged,
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }

    fn from_changed(changed: bool) -> Self {
        if changed {
            ActionOutcome::Applied
        } else {
            ActionOutcome::Unchanged
        }
    }
}

/// Where to send the moderator after an action taken from the queue.
///
/// Filter, page and order are carried over unchanged.
pub fn redirect_location(state: &QueueViewState) -> String {
    state.href()
}
