//! Board data model

use crate::account::AccountDirectory;
use crate::activity::ModerationLog;
use crate::comment::{Comment, CommentManager};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the moderation desk persists: comments, accounts and the
/// moderation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// When the board was created
    pub created_at: DateTime<Utc>,
    /// When the board was last saved
    pub updated_at: DateTime<Utc>,
    /// All comments
    #[serde(default)]
    pub comments: CommentManager,
    /// User accounts
    #[serde(default)]
    pub accounts: AccountDirectory,
    /// Moderator actions
    #[serde(default)]
    pub activity: ModerationLog,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            comments: CommentManager::new(),
            accounts: AccountDirectory::new(),
            activity: ModerationLog::new(),
        }
    }

    /// Mark board as updated
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Author display name for a comment
    pub fn author_name(&self, comment: &Comment) -> String {
        self.accounts.display_name(comment.author_id)
    }

    /// Summary counts
    pub fn info(&self) -> BoardInfo {
        BoardInfo::from(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a board for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comment_count: usize,
    pub user_count: usize,
    pub activity_count: usize,
}

impl From<&Board> for BoardInfo {
    fn from(board: &Board) -> Self {
        Self {
            created_at: board.created_at,
            updated_at: board.updated_at,
            comment_count: board.comments.count(),
            user_count: board.accounts.count(),
            activity_count: board.activity.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Role;
    use crate::comment::CommentBuilder;
    use crate::types::CommentableRef;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        let info = board.info();
        assert_eq!(info.comment_count, 0);
        assert_eq!(info.user_count, 0);
        assert_eq!(info.activity_count, 0);
    }

    #[test]
    fn test_author_name() {
        let mut board = Board::new();
        let alice = board.accounts.register("alice", Role::Citizen).unwrap();
        let id = board
            .comments
            .create(CommentBuilder::new(CommentableRef::debate(1), alice).body("hi"))
            .unwrap();

        let comment = board.comments.get(id).unwrap();
        assert_eq!(board.author_name(comment), "alice");
    }

    #[test]
    fn test_touch_updates_timestamp() {
        let mut board = Board::new();
        let before = board.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        board.touch();
        assert!(board.updated_at > before);
    }

    #[test]
    fn test_board_serialization() {
        let mut board = Board::new();
        let alice = board.accounts.register("alice", Role::Citizen).unwrap();
        board
            .comments
            .create(CommentBuilder::new(CommentableRef::debate(1), alice).body("hi"))
            .unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let board2: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board2.comments.count(), 1);
        assert_eq!(board2.accounts.count(), 1);
    }
}
