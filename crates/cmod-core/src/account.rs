//! User accounts, roles and the acting viewer

use crate::error::{ModerationError, Result};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Citizen,
    Moderator,
}

impl Role {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "citizen" | "user" => Some(Role::Citizen),
            "moderator" | "mod" => Some(Role::Moderator),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Citizen => write!(f, "citizen"),
            Role::Moderator => write!(f, "moderator"),
        }
    }
}

/// The person a page is rendered for or an action is performed by
///
/// Passed explicitly into every policy decision. `id` is `None` for
/// anonymous visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewer {
    pub id: Option<UserId>,
    pub role: Role,
}

impl Viewer {
    /// Visitor without an account
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn citizen(id: UserId) -> Self {
        Self {
            id: Some(id),
            role: Role::Citizen,
        }
    }

    pub fn moderator(id: UserId) -> Self {
        Self {
            id: Some(id),
            role: Role::Moderator,
        }
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }

    /// Whether this viewer is the given user
    pub fn is(&self, user: UserId) -> bool {
        self.id == Some(user)
    }

    /// The viewer's id, or `Unauthorized` for anonymous visitors
    pub fn require_id(&self) -> Result<UserId> {
        self.id.ok_or_else(|| {
            ModerationError::Unauthorized("you must be signed in".to_string())
        })
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub banned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub banned_by: Option<UserId>,
}

impl UserAccount {
    pub fn is_banned(&self) -> bool {
        self.banned_at.is_some()
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    /// Viewer acting as this account; banned accounts act anonymously
    pub fn viewer(&self) -> Viewer {
        if self.is_banned() {
            Viewer::anonymous()
        } else {
            Viewer {
                id: Some(self.id),
                role: self.role,
            }
        }
    }

    /// Disable the account. Returns false if it was already banned.
    pub fn ban(&mut self, by: UserId) -> bool {
        if self.is_banned() {
            return false;
        }
        self.banned_at = Some(Utc::now());
        self.banned_by = Some(by);
        true
    }
}

/// Registry of user accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountDirectory {
    #[serde(default)]
    last_id: u64,
    #[serde(default)]
    accounts: BTreeMap<UserId, UserAccount>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account
    pub fn register(&mut self, username: &str, role: Role) -> Result<UserId> {
        let username = username.trim();
        if username.is_empty() || username.chars().any(char::is_whitespace) {
            return Err(ModerationError::Validation(format!(
                "Invalid username: '{}'",
                username
            )));
        }
        if self.find_by_username(username).is_some() {
            return Err(ModerationError::Validation(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        self.last_id += 1;
        let id = UserId(self.last_id);
        self.accounts.insert(
            id,
            UserAccount {
                id,
                username: username.to_string(),
                role,
                created_at: Utc::now(),
                banned_at: None,
                banned_by: None,
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: UserId) -> Option<&UserAccount> {
        self.accounts.get(&id)
    }

    pub fn get_mut(&mut self, id: UserId) -> Option<&mut UserAccount> {
        self.accounts.get_mut(&id)
    }

    /// Get an account or fail with `UserNotFound`
    pub fn require(&self, id: UserId) -> Result<&UserAccount> {
        self.accounts
            .get(&id)
            .ok_or_else(|| ModerationError::user_not_found(id))
    }

    /// Mutable variant of [`require`](Self::require)
    pub fn require_mut(&mut self, id: UserId) -> Result<&mut UserAccount> {
        self.accounts
            .get_mut(&id)
            .ok_or_else(|| ModerationError::user_not_found(id))
    }

    /// Case-insensitive username lookup
    pub fn find_by_username(&self, username: &str) -> Option<&UserAccount> {
        self.accounts
            .values()
            .find(|a| a.username.eq_ignore_ascii_case(username))
    }

    /// Look up by numeric id or by username
    pub fn resolve(&self, name_or_id: &str) -> Result<&UserAccount> {
        if let Ok(id) = name_or_id.parse::<UserId>() {
            if let Some(account) = self.accounts.get(&id) {
                return Ok(account);
            }
        }
        self.find_by_username(name_or_id)
            .ok_or_else(|| ModerationError::UserNotFound(name_or_id.to_string()))
    }

    /// Viewer for an optional account id; unknown ids act anonymously
    pub fn viewer_for(&self, id: Option<UserId>) -> Viewer {
        id.and_then(|id| self.accounts.get(&id))
            .map(UserAccount::viewer)
            .unwrap_or_else(Viewer::anonymous)
    }

    /// Display name for a user, falling back to the id
    pub fn display_name(&self, id: UserId) -> String {
        self.accounts
            .get(&id)
            .map(|a| a.username.clone())
            .unwrap_or_else(|| format!("user#{}", id))
    }

    /// All accounts in id order
    pub fn all(&self) -> Vec<&UserAccount> {
        self.accounts.values().collect()
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }
}
