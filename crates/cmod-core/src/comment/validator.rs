//! Comment validation

use super::builder::CommentBuilder;
use super::model::Comment;
use crate::error::{ModerationError, Result};

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Minimum comment length
pub const MIN_COMMENT_LENGTH: usize = 1;

/// Validator for new comments
pub struct CommentValidator {
    max_length: usize,
    min_length: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Validate comment body
    pub fn validate_body(&self, body: &str) -> Result<()> {
        let trimmed = body.trim();
        let length = trimmed.chars().count();

        if length < self.min_length {
            return Err(ModerationError::Validation(
                "Comment body cannot be empty".to_string(),
            ));
        }

        if length > self.max_length {
            return Err(ModerationError::Validation(format!(
                "Comment body exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    /// Validate that a reply targets a parent in the same thread
    pub fn validate_parent(&self, draft: &CommentBuilder, parent: &Comment) -> Result<()> {
        if parent.commentable != draft.commentable() {
            return Err(ModerationError::Validation(format!(
                "Parent comment {} belongs to {}, not {}",
                parent.id,
                parent.commentable,
                draft.commentable()
            )));
        }
        Ok(())
    }

    /// Validate a draft before it is stored
    pub fn validate(&self, draft: &CommentBuilder, parent: Option<&Comment>) -> Result<()> {
        self.validate_body(draft.body_text().unwrap_or_default())?;

        if let Some(parent) = parent {
            self.validate_parent(draft, parent)?;
        }

        Ok(())
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}
