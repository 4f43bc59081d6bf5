//! Comment thread rendering
//!
//! Builds the reply tree for a commentable as a particular viewer sees it.
//! Each node's body goes through the visibility policy on its own, so a
//! hidden parent never hides its replies.

use crate::account::Viewer;
use crate::board::Board;
use crate::comment::Comment;
use crate::moderation::ModerationAction;
use crate::policy::{CommentActions, RenderedBody, VisibilityPolicy};
use crate::queue::QueueViewState;
use crate::types::{CommentId, CommentableRef, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// One comment in a rendered thread
#[derive(Debug, Clone, Serialize)]
pub struct ThreadNode {
    pub id: CommentId,
    pub author_id: UserId,
    pub author: String,
    pub body: RenderedBody,
    pub created_at: DateTime<Utc>,
    /// Shown to moderators only
    pub flags_count: Option<usize>,
    pub actions: CommentActions,
    pub hide_href: Option<String>,
    pub ban_href: Option<String>,
    pub flag_href: Option<String>,
    pub unflag_href: Option<String>,
    pub children: Vec<ThreadNode>,
}

/// Rendered comment tree for one commentable
#[derive(Debug, Clone, Serialize)]
pub struct ThreadView {
    pub commentable: CommentableRef,
    pub roots: Vec<ThreadNode>,
    pub total: usize,
}

impl ThreadView {
    /// Build the tree. Roots and siblings come in creation order; a comment
    /// whose parent is not in this thread is shown as a root.
    pub fn build(
        board: &Board,
        commentable: CommentableRef,
        viewer: &Viewer,
        policy: &VisibilityPolicy,
    ) -> Self {
        let comments = board.comments.get_by_commentable(&commentable);
        let present: BTreeSet<CommentId> = comments.iter().map(|c| c.id).collect();

        let mut children: HashMap<CommentId, Vec<&Comment>> = HashMap::new();
        let mut roots = Vec::new();
        for comment in comments {
            match comment.parent_id {
                Some(parent) if present.contains(&parent) => {
                    children.entry(parent).or_default().push(comment)
                }
                _ => roots.push(comment),
            }
        }

        let builder = NodeBuilder {
            board,
            viewer,
            policy,
            children: &children,
        };
        let roots: Vec<ThreadNode> = roots.into_iter().map(|c| builder.node(c)).collect();
        let total = roots.iter().map(ThreadNode::count).sum();

        Self {
            commentable,
            roots,
            total,
        }
    }

    /// Number of rendered comments, hidden ones included
    pub fn count(&self) -> usize {
        self.total
    }

    /// Depth-first walk with nesting depth, roots at depth 0
    pub fn flatten(&self) -> Vec<(usize, &ThreadNode)> {
        let mut out = Vec::with_capacity(self.total);
        for root in &self.roots {
            root.walk(0, &mut out);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl ThreadNode {
    /// This node plus all descendants
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ThreadNode::count).sum::<usize>()
    }

    fn walk<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a ThreadNode)>) {
        out.push((depth, self));
        for child in &self.children {
            child.walk(depth + 1, out);
        }
    }
}

struct NodeBuilder<'a> {
    board: &'a Board,
    viewer: &'a Viewer,
    policy: &'a VisibilityPolicy,
    children: &'a HashMap<CommentId, Vec<&'a Comment>>,
}

impl NodeBuilder<'_> {
    fn node(&self, comment: &Comment) -> ThreadNode {
        let actions = self.policy.available_actions(self.viewer, comment);
        let queue = QueueViewState::default();

        let children: Vec<ThreadNode> = self
            .children
            .get(&comment.id)
            .map(|replies| replies.iter().map(|c| self.node(c)).collect())
            .unwrap_or_default();

        ThreadNode {
            id: comment.id,
            author_id: comment.author_id,
            author: self.board.author_name(comment),
            body: self.policy.visible_body(self.viewer, comment),
            created_at: comment.created_at,
            flags_count: self
                .viewer
                .is_moderator()
                .then(|| comment.flags_count()),
            hide_href: actions
                .hide
                .then(|| queue.action_href(comment.id, ModerationAction::Hide)),
            ban_href: actions
                .ban_author
                .then(|| queue.action_href(comment.id, ModerationAction::BanAuthor)),
            flag_href: actions.flag.then(|| format!("/comments/{}/flag", comment.id)),
            unflag_href: actions
                .unflag
                .then(|| format!("/comments/{}/unflag", comment.id)),
            actions,
            children,
        }
    }
}
