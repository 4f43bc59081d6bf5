//! Error types for cmod

use crate::types::{CommentId, UserId};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cmod
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The viewer is not allowed to perform the action
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// User account not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The comment is not in a state that allows the action
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ModerationError>,
    },
}

impl ModerationError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ModerationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a missing account looked up by id
    pub fn user_not_found(id: UserId) -> Self {
        ModerationError::UserNotFound(id.to_string())
    }

    /// HTTP status code equivalent of this error
    pub fn status_code(&self) -> u16 {
        match self {
            ModerationError::Unauthorized(_) => 403,
            ModerationError::CommentNotFound(_)
            | ModerationError::UserNotFound(_)
            | ModerationError::FileNotFound(_) => 404,
            ModerationError::InvalidTransition(_) => 409,
            ModerationError::Validation(_) => 422,
            ModerationError::WithContext { source, .. } => source.status_code(),
            _ => 500,
        }
    }

    /// Check whether this is an authorization failure (possibly wrapped)
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == 403
    }

    /// Check whether this is a not-found failure (possibly wrapped)
    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

impl From<toml::de::Error> for ModerationError {
    fn from(err: toml::de::Error) -> Self {
        ModerationError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ModerationError {
    fn from(err: toml::ser::Error) -> Self {
        ModerationError::Toml(err.to_string())
    }
}

/// Result type alias for cmod
pub type Result<T> = std::result::Result<T, ModerationError>;
