//! Comment manager for storage and lookup

use super::builder::CommentBuilder;
use super::index::CommentIndex;
use super::model::{Comment, ModerationStatus};
use crate::error::{ModerationError, Result};
use crate::types::{CommentId, CommentableRef, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Manager for comments with indexing support
///
/// Comments are never removed; hiding is a soft state on the comment.
#[derive(Debug, Clone)]
pub struct CommentManager {
    /// All comments by ID, in creation order
    comments: BTreeMap<CommentId, Comment>,
    /// Last allocated id
    last_id: u64,
    /// Multi-dimensional index
    index: CommentIndex,
}

impl CommentManager {
    /// Create a new empty comment manager
    pub fn new() -> Self {
        Self {
            comments: BTreeMap::new(),
            last_id: 0,
            index: CommentIndex::new(),
        }
    }

    /// Allocate an id and store a comment built from the draft
    pub fn create(&mut self, draft: CommentBuilder) -> Result<CommentId> {
        let id = CommentId(self.last_id + 1);
        let comment = draft.build(id)?;
        self.insert(comment)
    }

    /// Store an already-built comment
    pub fn insert(&mut self, comment: Comment) -> Result<CommentId> {
        let id = comment.id;

        if self.comments.contains_key(&id) {
            return Err(ModerationError::Validation(format!(
                "Comment with ID {} already exists",
                id
            )));
        }

        self.last_id = self.last_id.max(id.0);
        self.index.add(&comment);
        self.comments.insert(id, comment);
        Ok(id)
    }

    /// Get a comment by ID
    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(&id)
    }

    /// Get a mutable comment by ID
    ///
    /// Callers must not change `commentable`, `author_id` or `parent_id`,
    /// which are indexed.
    pub fn get_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        self.comments.get_mut(&id)
    }

    /// Get a comment or fail with `CommentNotFound`
    pub fn require(&self, id: CommentId) -> Result<&Comment> {
        self.comments
            .get(&id)
            .ok_or(ModerationError::CommentNotFound(id))
    }

    /// Mutable variant of [`require`](Self::require)
    pub fn require_mut(&mut self, id: CommentId) -> Result<&mut Comment> {
        self.comments
            .get_mut(&id)
            .ok_or(ModerationError::CommentNotFound(id))
    }

    /// Check if a comment exists
    pub fn contains(&self, id: CommentId) -> bool {
        self.comments.contains_key(&id)
    }

    /// All comments in creation order
    pub fn all(&self) -> Vec<&Comment> {
        self.comments.values().collect()
    }

    /// Comments on a resource in creation order
    pub fn get_by_commentable(&self, commentable: &CommentableRef) -> Vec<&Comment> {
        self.resolve(self.index.get_by_commentable(commentable))
    }

    /// Comments by an author in creation order
    pub fn get_by_author(&self, author: UserId) -> Vec<&Comment> {
        self.resolve(self.index.get_by_author(author))
    }

    /// Direct replies in creation order
    pub fn get_children(&self, parent: CommentId) -> Vec<&Comment> {
        self.resolve(self.index.get_children(parent))
    }

    /// Resources that have at least one comment
    pub fn commentables(&self) -> Vec<CommentableRef> {
        self.index.commentables().into_iter().copied().collect()
    }

    fn resolve(&self, ids: Vec<CommentId>) -> Vec<&Comment> {
        ids.iter().filter_map(|id| self.comments.get(id)).collect()
    }

    /// Search comments by body
    pub fn search(&self, query: &str) -> Vec<&Comment> {
        let query_lower = query.to_lowercase();
        self.comments
            .values()
            .filter(|c| c.body.to_lowercase().contains(&query_lower))
            .collect()
    }

    /// Get total comment count
    pub fn count(&self) -> usize {
        self.comments.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Get count by moderation status
    pub fn count_by_status(&self) -> HashMap<ModerationStatus, usize> {
        let mut counts = HashMap::new();
        for comment in self.comments.values() {
            *counts.entry(comment.status()).or_insert(0) += 1;
        }
        counts
    }

    /// Rebuild index (after deserialization)
    pub fn rebuild_index(&mut self) {
        self.index.rebuild(self.comments.values());
    }
}

impl Default for CommentManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct CommentManagerRef<'a> {
    last_id: u64,
    comments: Vec<&'a Comment>,
}

impl Serialize for CommentManager {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        CommentManagerRef {
            last_id: self.last_id,
            comments: self.all(),
        }
        .serialize(serializer)
    }
}

// Custom deserialization to rebuild index
impl<'de> Deserialize<'de> for CommentManager {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CommentManagerHelper {
            #[serde(default)]
            last_id: u64,
            comments: Vec<Comment>,
        }

        let helper = CommentManagerHelper::deserialize(deserializer)?;
        let mut manager = Self::new();
        for comment in helper.comments {
            manager.insert(comment).map_err(serde::de::Error::custom)?;
        }
        manager.last_id = manager.last_id.max(helper.last_id);
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommentableKind;
    use pretty_assertions::assert_eq;

    fn draft(body: &str) -> CommentBuilder {
        CommentBuilder::new(CommentableRef::debate(1), UserId(1)).body(body)
    }

    #[test]
    fn test_create_allocates_sequential_ids() {
        let mut manager = CommentManager::new();
        let a = manager.create(draft("first")).unwrap();
        let b = manager.create(draft("second")).unwrap();

        assert_eq!(a, CommentId(1));
        assert_eq!(b, CommentId(2));
        assert_eq!(manager.count(), 2);
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let mut manager = CommentManager::new();
        let comment = draft("Test").build(CommentId(1)).unwrap();

        manager.insert(comment.clone()).unwrap();
        assert!(manager.insert(comment).is_err());
    }

    #[test]
    fn test_insert_advances_id_counter() {
        let mut manager = CommentManager::new();
        manager.insert(draft("imported").build(CommentId(10)).unwrap()).unwrap();
        assert_eq!(manager.create(draft("next")).unwrap(), CommentId(11));
    }

    #[test]
    fn test_require_missing() {
        let manager = CommentManager::new();
        let err = manager.require(CommentId(9)).unwrap_err();
        assert!(matches!(err, ModerationError::CommentNotFound(CommentId(9))));
    }

    #[test]
    fn test_get_by_commentable_in_creation_order() {
        let mut manager = CommentManager::new();
        manager.create(draft("a")).unwrap();
        manager
            .create(
                CommentBuilder::new(CommentableRef::new(CommentableKind::Poll, 1), UserId(1))
                    .body("elsewhere"),
            )
            .unwrap();
        manager.create(draft("b")).unwrap();

        let bodies: Vec<_> = manager
            .get_by_commentable(&CommentableRef::debate(1))
            .iter()
            .map(|c| c.body.as_str())
            .collect();
        assert_eq!(bodies, vec!["a", "b"]);
        assert_eq!(manager.commentables().len(), 2);
    }

    #[test]
    fn test_children() {
        let mut manager = CommentManager::new();
        let parent = manager.create(draft("parent")).unwrap();
        manager.create(draft("reply").reply_to(parent)).unwrap();

        assert_eq!(manager.get_children(parent).len(), 1);
    }

    #[test]
    fn test_search() {
        let mut manager = CommentManager::new();

        manager.create(draft("Buy cheap watches")).unwrap();
        manager.create(draft("I support this proposal")).unwrap();
        manager.create(draft("CHEAP pills")).unwrap();

        assert_eq!(manager.search("cheap").len(), 2);
        assert_eq!(manager.search("proposal").len(), 1);
        assert_eq!(manager.search("nonexistent").len(), 0);
    }

    #[test]
    fn test_count_by_status() {
        let mut manager = CommentManager::new();
        let a = manager.create(draft("a")).unwrap();
        let b = manager.create(draft("b")).unwrap();
        manager.create(draft("c")).unwrap();

        manager.get_mut(a).unwrap().add_flag(UserId(2));
        manager.get_mut(b).unwrap().hide();

        let counts = manager.count_by_status();
        assert_eq!(counts.get(&ModerationStatus::PendingReview), Some(&1));
        assert_eq!(counts.get(&ModerationStatus::Hidden), Some(&1));
        assert_eq!(counts.get(&ModerationStatus::Normal), Some(&1));
        assert_eq!(counts.get(&ModerationStatus::Reviewed), None);
    }

    #[test]
    fn test_serialization_rebuilds_index() {
        let mut manager = CommentManager::new();
        let parent = manager.create(draft("parent")).unwrap();
        manager.create(draft("reply").reply_to(parent)).unwrap();

        let json = serde_json::to_string(&manager).unwrap();
        let manager2: CommentManager = serde_json::from_str(&json).unwrap();

        assert_eq!(manager.count(), manager2.count());
        assert_eq!(manager2.get_children(parent).len(), 1);
        let mut manager2 = manager2;
        assert_eq!(manager2.create(draft("next")).unwrap(), CommentId(3));
    }
}
