//! Comment data models

use crate::types::{CommentId, CommentableRef, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment posted on a commentable resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Resource the comment belongs to
    pub commentable: CommentableRef,
    /// Parent comment when this is a reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    /// Author of the comment
    pub author_id: UserId,
    /// Comment content
    pub body: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
    /// Set when a moderator hides the comment
    #[serde(default)]
    pub hidden_at: Option<DateTime<Utc>>,
    /// Set when a moderator dismisses the flags
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Abuse reports, at most one per user
    #[serde(default)]
    pub flags: Vec<Flag>,
}

impl Comment {
    /// Whether a moderator has hidden the comment
    pub fn is_hidden(&self) -> bool {
        self.hidden_at.is_some()
    }

    /// Whether a moderator has marked the flags reviewed
    pub fn is_reviewed(&self) -> bool {
        self.reviewed_at.is_some()
    }

    /// Whether at least one user flagged the comment as inappropriate
    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Number of flags
    pub fn flags_count(&self) -> usize {
        self.flags.len()
    }

    /// Whether this comment is a reply to another comment
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Whether the given user wrote this comment
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author_id == user
    }

    /// Whether the given user has an outstanding flag on this comment
    pub fn has_flag_from(&self, user: UserId) -> bool {
        self.flags.iter().any(|f| f.user_id == user)
    }

    /// Derived moderation status
    pub fn status(&self) -> ModerationStatus {
        if self.is_hidden() {
            ModerationStatus::Hidden
        } else if !self.is_flagged() {
            ModerationStatus::Normal
        } else if self.is_reviewed() {
            ModerationStatus::Reviewed
        } else {
            ModerationStatus::PendingReview
        }
    }

    /// Hide the comment. Returns false if it was already hidden.
    pub fn hide(&mut self) -> bool {
        if self.is_hidden() {
            return false;
        }
        let now = Utc::now();
        self.hidden_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Mark the flags reviewed. Returns false if already reviewed.
    pub fn mark_reviewed(&mut self) -> bool {
        if self.is_reviewed() {
            return false;
        }
        let now = Utc::now();
        self.reviewed_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Record a flag from a user. Returns false if the user already flagged.
    pub fn add_flag(&mut self, user: UserId) -> bool {
        if self.has_flag_from(user) {
            return false;
        }
        let now = Utc::now();
        self.flags.push(Flag {
            user_id: user,
            created_at: now,
        });
        self.updated_at = now;
        true
    }

    /// Withdraw a user's flag. Returns false if there was none.
    pub fn remove_flag(&mut self, user: UserId) -> bool {
        if let Some(pos) = self.flags.iter().position(|f| f.user_id == user) {
            self.flags.remove(pos);
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }
}

/// A single abuse report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// User who reported the comment
    pub user_id: UserId,
    /// When the report was made
    pub created_at: DateTime<Utc>,
}

/// Moderation status, derived from the comment's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// Not flagged, not hidden
    Normal,
    /// Flagged, neither hidden nor reviewed
    PendingReview,
    /// Flagged and dismissed by a moderator
    Reviewed,
    /// Hidden by a moderator
    Hidden,
}

impl ModerationStatus {
    /// Short label for listings
    pub fn label(&self) -> &'static str {
        match self {
            ModerationStatus::Normal => "normal",
            ModerationStatus::PendingReview => "pending",
            ModerationStatus::Reviewed => "reviewed",
            ModerationStatus::Hidden => "hidden",
        }
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
pub(crate) fn test_comment(id: u64, author: u64) -> Comment {
    let now = Utc::now();
    Comment {
        id: CommentId(id),
        commentable: CommentableRef::debate(1),
        parent_id: None,
        author_id: UserId(author),
        body: format!("Comment {}", id),
        created_at: now,
        updated_at: now,
        hidden_at: None,
        reviewed_at: None,
        flags: Vec::new(),
    }
}
