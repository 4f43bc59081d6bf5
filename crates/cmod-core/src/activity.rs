//! Moderation activity log

use crate::types::{ActivityId, CommentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a moderator did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    HideComment,
    MarkReviewed,
    BanUser,
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityAction::HideComment => write!(f, "hid comment"),
            ActivityAction::MarkReviewed => write!(f, "marked comment reviewed"),
            ActivityAction::BanUser => write!(f, "banned user"),
        }
    }
}

/// What the action applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ActivityTarget {
    Comment(CommentId),
    User(UserId),
}

impl fmt::Display for ActivityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityTarget::Comment(id) => write!(f, "comment {}", id),
            ActivityTarget::User(id) => write!(f, "user {}", id),
        }
    }
}

/// One log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: ActivityId,
    pub actor_id: UserId,
    pub action: ActivityAction,
    pub target: ActivityTarget,
    pub created_at: DateTime<Utc>,
}

/// Append-only log of moderator actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationLog {
    #[serde(default)]
    entries: Vec<ActivityEntry>,
}

impl ModerationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(
        &mut self,
        actor_id: UserId,
        action: ActivityAction,
        target: ActivityTarget,
    ) -> &ActivityEntry {
        self.entries.push(ActivityEntry {
            id: ActivityId::new(),
            actor_id,
            action,
            target,
            created_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// The most recent `limit` entries, newest first
    pub fn recent(&self, limit: usize) -> Vec<&ActivityEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Entries concerning a target, oldest first
    pub fn for_target(&self, target: ActivityTarget) -> Vec<&ActivityEntry> {
        self.entries.iter().filter(|e| e.target == target).collect()
    }

    /// Entries by an actor, oldest first
    pub fn by_actor(&self, actor: UserId) -> Vec<&ActivityEntry> {
        self.entries.iter().filter(|e| e.actor_id == actor).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
