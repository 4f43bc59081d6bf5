//! Core type definitions for cmod

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a comment
///
/// Allocated sequentially by the board, so ordering by id is creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = crate::ModerationError;

    fn from_str(s: &str) -> crate::Result<Self> {
        parse_positive(s, "comment").map(CommentId)
    }
}

/// Unique identifier for a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = crate::ModerationError;

    fn from_str(s: &str) -> crate::Result<Self> {
        parse_positive(s, "user").map(UserId)
    }
}

fn parse_positive(s: &str, what: &str) -> crate::Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(crate::ModerationError::Validation(format!(
            "Invalid {} id: {}",
            what, s
        ))),
    }
}

/// Unique identifier for a moderation log entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub Uuid);

impl ActivityId {
    /// Generate a new ActivityId
    pub fn new() -> Self {
        ActivityId(Uuid::new_v4())
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of resource a comment thread hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentableKind {
    Debate,
    Proposal,
    Poll,
}

impl CommentableKind {
    /// All kinds, in display order
    pub const ALL: [CommentableKind; 3] = [
        CommentableKind::Debate,
        CommentableKind::Proposal,
        CommentableKind::Poll,
    ];

    /// Plural path segment used in URLs ("debates", ...)
    pub fn path_segment(&self) -> &'static str {
        match self {
            CommentableKind::Debate => "debates",
            CommentableKind::Proposal => "proposals",
            CommentableKind::Poll => "polls",
        }
    }

    /// Parse from a singular or plural name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debate" | "debates" => Some(CommentableKind::Debate),
            "proposal" | "proposals" => Some(CommentableKind::Proposal),
            "poll" | "polls" => Some(CommentableKind::Poll),
            _ => None,
        }
    }
}

impl fmt::Display for CommentableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentableKind::Debate => write!(f, "Debate"),
            CommentableKind::Proposal => write!(f, "Proposal"),
            CommentableKind::Poll => write!(f, "Poll"),
        }
    }
}

/// Reference to the resource a comment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentableRef {
    pub kind: CommentableKind,
    pub id: u64,
}

impl CommentableRef {
    pub fn new(kind: CommentableKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn debate(id: u64) -> Self {
        Self::new(CommentableKind::Debate, id)
    }

    /// Path of the thread page, e.g. `/debates/7`
    pub fn path(&self) -> String {
        format!("/{}/{}", self.kind.path_segment(), self.id)
    }
}

impl FromStr for CommentableRef {
    type Err = crate::ModerationError;

    /// Accepts `debate:7`, `debates/7` or `/debates/7`
    fn from_str(s: &str) -> crate::Result<Self> {
        let invalid = || {
            crate::ModerationError::Validation(format!(
                "Invalid commentable '{}', expected e.g. debate:7",
                s
            ))
        };
        let (kind, id) = s
            .trim()
            .trim_start_matches('/')
            .split_once([':', '/'])
            .ok_or_else(invalid)?;
        let kind = CommentableKind::from_name(kind).ok_or_else(invalid)?;
        let id = parse_positive(id, "commentable").map_err(|_| invalid())?;
        Ok(Self::new(kind, id))
    }
}

impl fmt::Display for CommentableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.id)
    }
}

/// Protocol version for compatibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    pub const V1_0: Self = Self { major: 1, minor: 0 };

    /// Check if this version is compatible with another version
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major
    }

    /// Parse a "major.minor" string
    pub fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::V1_0
    }
}
