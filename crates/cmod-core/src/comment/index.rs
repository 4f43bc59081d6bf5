//! Comment indexing for fast lookup

use super::model::Comment;
use crate::types::{CommentId, CommentableRef, UserId};
use std::collections::HashMap;

/// Multi-dimensional index for comments
///
/// Id lists are kept in ascending order, which is creation order.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    /// Index by commentable resource
    by_commentable: HashMap<CommentableRef, Vec<CommentId>>,
    /// Index by author
    by_author: HashMap<UserId, Vec<CommentId>>,
    /// Replies by parent
    children: HashMap<CommentId, Vec<CommentId>>,
}

fn insert_sorted(ids: &mut Vec<CommentId>, id: CommentId) {
    if let Err(pos) = ids.binary_search(&id) {
        ids.insert(pos, id);
    }
}

impl CommentIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the index
    pub fn add(&mut self, comment: &Comment) {
        insert_sorted(
            self.by_commentable.entry(comment.commentable).or_default(),
            comment.id,
        );
        insert_sorted(self.by_author.entry(comment.author_id).or_default(), comment.id);

        if let Some(parent) = comment.parent_id {
            insert_sorted(self.children.entry(parent).or_default(), comment.id);
        }
    }

    /// Get comments on a resource
    pub fn get_by_commentable(&self, commentable: &CommentableRef) -> Vec<CommentId> {
        self.by_commentable.get(commentable).cloned().unwrap_or_default()
    }

    /// Get comments by an author
    pub fn get_by_author(&self, author: UserId) -> Vec<CommentId> {
        self.by_author.get(&author).cloned().unwrap_or_default()
    }

    /// Get direct replies to a comment
    pub fn get_children(&self, parent: CommentId) -> Vec<CommentId> {
        self.children.get(&parent).cloned().unwrap_or_default()
    }

    /// Get comment count for a resource
    pub fn commentable_comment_count(&self, commentable: &CommentableRef) -> usize {
        self.by_commentable.get(commentable).map(|ids| ids.len()).unwrap_or(0)
    }

    /// Get all resources that have comments
    pub fn commentables(&self) -> Vec<&CommentableRef> {
        let mut keys: Vec<_> = self.by_commentable.keys().collect();
        keys.sort();
        keys
    }

    /// Clear the entire index
    pub fn clear(&mut self) {
        self.by_commentable.clear();
        self.by_author.clear();
        self.children.clear();
    }

    /// Rebuild index from a collection of comments
    pub fn rebuild(&mut self, comments: impl IntoIterator<Item = impl std::borrow::Borrow<Comment>>) {
        self.clear();
        for comment in comments {
            self.add(comment.borrow());
        }
    }
}
