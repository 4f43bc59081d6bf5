//! Comment builder for fluent API

use super::model::Comment;
use crate::error::{ModerationError, Result};
use crate::types::{CommentId, CommentableRef, UserId};
use chrono::{DateTime, Utc};

/// Builder for creating comments with fluent API
///
/// Ids are allocated by [`CommentManager`](super::CommentManager), so the
/// builder only receives one at [`build`](Self::build) time.
#[derive(Debug, Clone)]
pub struct CommentBuilder {
    commentable: CommentableRef,
    author_id: UserId,
    parent_id: Option<CommentId>,
    body: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl CommentBuilder {
    /// Create a new builder for a top-level comment
    pub fn new(commentable: CommentableRef, author_id: UserId) -> Self {
        Self {
            commentable,
            author_id,
            parent_id: None,
            body: None,
            created_at: None,
        }
    }

    /// Set the comment body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Make this a reply to another comment
    pub fn reply_to(mut self, parent_id: CommentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Override the creation timestamp (imports, fixtures)
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Target resource
    pub fn commentable(&self) -> CommentableRef {
        self.commentable
    }

    /// Parent comment, if any
    pub fn parent_id(&self) -> Option<CommentId> {
        self.parent_id
    }

    /// Author
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Body as set so far
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Build the comment with the given id
    pub fn build(self, id: CommentId) -> Result<Comment> {
        let body = self.body.ok_or_else(|| {
            ModerationError::Validation("Comment body is required".to_string())
        })?;

        if body.trim().is_empty() {
            return Err(ModerationError::Validation(
                "Comment body cannot be empty".to_string(),
            ));
        }

        let now = self.created_at.unwrap_or_else(Utc::now);

        Ok(Comment {
            id,
            commentable: self.commentable,
            parent_id: self.parent_id,
            author_id: self.author_id,
            body,
            created_at: now,
            updated_at: now,
            hidden_at: None,
            reviewed_at: None,
            flags: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_builder() {
        let comment = CommentBuilder::new(CommentableRef::debate(1), UserId(2))
            .body("Great debate")
            .build(CommentId(1))
            .unwrap();

        assert_eq!(comment.body, "Great debate");
        assert_eq!(comment.author_id, UserId(2));
        assert!(comment.parent_id.is_none());
        assert!(!comment.is_hidden());
    }

    #[test]
    fn test_reply_builder() {
        let comment = CommentBuilder::new(CommentableRef::debate(1), UserId(2))
            .body("I disagree")
            .reply_to(CommentId(5))
            .build(CommentId(6))
            .unwrap();

        assert_eq!(comment.parent_id, Some(CommentId(5)));
        assert!(comment.is_reply());
    }

    #[test]
    fn test_builder_without_body_fails() {
        let result = CommentBuilder::new(CommentableRef::debate(1), UserId(2)).build(CommentId(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_blank_body_fails() {
        let result = CommentBuilder::new(CommentableRef::debate(1), UserId(2))
            .body("   ")
            .build(CommentId(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_created_at_override() {
        let at = Utc::now() - chrono::Duration::days(3);
        let comment = CommentBuilder::new(CommentableRef::debate(1), UserId(2))
            .body("Old")
            .created_at(at)
            .build(CommentId(1))
            .unwrap();
        assert_eq!(comment.created_at, at);
        assert_eq!(comment.updated_at, at);
    }
}
