//! Moderation queue
//!
//! Filtering, ordering and pagination of flagged comments, plus the view
//! model the CLI, TUI and web front ends render.

pub mod filter;
pub mod page;
pub mod view_state;

pub use filter::{nav_filters, QueueFilter, QueueOrder};
pub use page::Page;
pub use view_state::{QueueViewState, QUEUE_PATH};

use crate::account::Viewer;
use crate::board::Board;
use crate::comment::{Comment, CommentManager, ModerationStatus};
use crate::error::{ModerationError, Result};
use crate::moderation::ModerationAction;
use crate::policy::{CommentActions, RenderedBody, VisibilityPolicy};
use crate::types::{CommentId, CommentableRef, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A navigation link to another filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub filter: QueueFilter,
    pub label: &'static str,
    pub href: String,
    /// Comments currently under that filter
    pub count: usize,
}

/// Navigation for the queue: one link per filter except the active one.
///
/// Links keep the current order and start at page 1.
pub fn nav_links(comments: &CommentManager, state: &QueueViewState) -> Vec<NavLink> {
    nav_filters(state.filter)
        .into_iter()
        .map(|filter| NavLink {
            filter,
            label: filter.label(),
            href: state.with_filter(filter).href(),
            count: comments.all().into_iter().filter(|c| filter.matches(c)).count(),
        })
        .collect()
}

/// Comments under `filter`, in `order`
pub fn filtered(comments: &CommentManager, filter: QueueFilter, order: QueueOrder) -> Vec<&Comment> {
    let mut matching: Vec<&Comment> = comments
        .all()
        .into_iter()
        .filter(|c| filter.matches(c))
        .collect();
    order.sort(&mut matching);
    matching
}

/// One row of the queue as shown to a moderator
#[derive(Debug, Clone, Serialize)]
pub struct QueueRow {
    pub id: CommentId,
    pub commentable: CommentableRef,
    /// Link text for the thread, e.g. `Debate #1`
    pub commentable_title: String,
    pub thread_href: String,
    pub author_id: UserId,
    pub author: String,
    pub author_banned: bool,
    pub body: RenderedBody,
    pub flags_count: usize,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub actions: CommentActions,
    /// Action endpoints carrying the current queue state
    pub hide_href: Option<String>,
    pub review_href: Option<String>,
    pub ban_href: Option<String>,
}

/// A rendered page of the moderation queue
#[derive(Debug, Clone, Serialize)]
pub struct QueueView {
    pub state: QueueViewState,
    pub title: &'static str,
    pub nav: Vec<NavLink>,
    pub rows: Page<QueueRow>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl QueueView {
    /// Build the queue page for a moderator.
    ///
    /// Fails with `Unauthorized` for everyone else.
    pub fn build(
        board: &Board,
        state: QueueViewState,
        viewer: &Viewer,
        policy: &VisibilityPolicy,
        per_page: usize,
    ) -> Result<Self> {
        if !viewer.is_moderator() {
            return Err(ModerationError::Unauthorized(
                "the moderation queue is only available to moderators".to_string(),
            ));
        }

        let comments = filtered(&board.comments, state.filter, state.order);
        let rows = Page::paginate(comments, state.page, per_page)
            .map(|comment| QueueRow::build(board, comment, &state, viewer, policy));

        // Past the end, "previous" jumps back to the last page with rows
        let prev_href = rows.has_prev().then(|| {
            state
                .with_page((state.page - 1).min(rows.total_pages()))
                .href()
        });
        let next_href = rows
            .has_next()
            .then(|| state.with_page(state.page + 1).href());

        Ok(Self {
            state,
            title: state.filter.label(),
            nav: nav_links(&board.comments, &state),
            rows,
            prev_href,
            next_href,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl QueueRow {
    fn build(
        board: &Board,
        comment: &Comment,
        state: &QueueViewState,
        viewer: &Viewer,
        policy: &VisibilityPolicy,
    ) -> Self {
        let actions = policy.available_actions(viewer, comment);
        let href = |allowed: bool, action: ModerationAction| {
            allowed.then(|| state.action_href(comment.id, action))
        };

        Self {
            id: comment.id,
            commentable: comment.commentable,
            commentable_title: comment.commentable.to_string(),
            thread_href: comment.commentable.path(),
            author_id: comment.author_id,
            author: board.author_name(comment),
            author_banned: board
                .accounts
                .get(comment.author_id)
                .is_some_and(|a| a.is_banned()),
            body: policy.visible_body(viewer, comment),
            flags_count: comment.flags_count(),
            status: comment.status(),
            created_at: comment.created_at,
            hide_href: href(actions.hide, ModerationAction::Hide),
            review_href: href(actions.mark_reviewed, ModerationAction::MarkReviewed),
            ban_href: href(actions.ban_author, ModerationAction::BanAuthor),
            actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Role;
    use crate::moderation::ModerationService;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    struct Seeded {
        board: Board,
        moderator: Viewer,
        pending: CommentId,
        reviewed: CommentId,
        hidden: CommentId,
        plain: CommentId,
    }

    fn seeded() -> Seeded {
        let mut board = Board::new();
        let moderator = Viewer::moderator(board.accounts.register("mod", Role::Moderator).unwrap());
        let alice = Viewer::citizen(board.accounts.register("alice", Role::Citizen).unwrap());
        let bob = Viewer::citizen(board.accounts.register("bob", Role::Citizen).unwrap());

        let mut service = ModerationService::new(&mut board);
        let debate = CommentableRef::debate(1);
        let pending = service.post(&alice, debate, None, "pending").unwrap();
        let reviewed = service.post(&alice, debate, None, "reviewed").unwrap();
        let hidden = service.post(&alice, debate, None, "hidden").unwrap();
        let plain = service.post(&alice, debate, None, "plain").unwrap();

        for id in [pending, reviewed, hidden] {
            service.flag(&bob, id).unwrap();
        }
        service.mark_reviewed(&moderator, reviewed).unwrap();
        service.hide(&moderator, hidden).unwrap();

        Seeded {
            board,
            moderator,
            pending,
            reviewed,
            hidden,
            plain,
        }
    }

    fn ids(board: &Board, filter: QueueFilter) -> BTreeSet<CommentId> {
        filtered(&board.comments, filter, QueueOrder::Created)
            .into_iter()
            .map(|c| c.id)
            .collect()
    }

    #[test]
    fn test_filter_partition() {
        let s = seeded();
        let pending = ids(&s.board, QueueFilter::PendingReview);
        let reviewed = ids(&s.board, QueueFilter::Reviewed);
        let all = ids(&s.board, QueueFilter::All);

        assert!(pending.is_disjoint(&reviewed));
        assert_eq!(all, pending.union(&reviewed).copied().collect());

        assert_eq!(pending, BTreeSet::from([s.pending]));
        assert_eq!(reviewed, BTreeSet::from([s.reviewed]));
        assert!(!all.contains(&s.hidden));
        assert!(!all.contains(&s.plain));
    }

    #[test]
    fn test_queue_requires_moderator() {
        let s = seeded();
        let err = QueueView::build(
            &s.board,
            QueueViewState::default(),
            &Viewer::citizen(UserId(2)),
            &VisibilityPolicy::default(),
            25,
        )
        .unwrap_err();
        assert!(err.is_unauthorized());

        assert!(QueueView::build(
            &s.board,
            QueueViewState::default(),
            &Viewer::anonymous(),
            &VisibilityPolicy::default(),
            25,
        )
        .is_err());
    }

    #[test]
    fn test_default_view_nav() {
        let s = seeded();
        let view = QueueView::build(
            &s.board,
            QueueViewState::default(),
            &s.moderator,
            &VisibilityPolicy::default(),
            25,
        )
        .unwrap();

        assert_eq!(view.title, "Pending");
        let labels: Vec<_> = view.nav.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["All", "Reviewed"]);
        assert_eq!(view.nav[0].href, "/moderation/comments?filter=all&page=1");
        assert_eq!(view.nav[0].count, 2);
        assert_eq!(view.nav[1].count, 1);
    }

    #[test]
    fn test_rows_carry_state_in_action_links() {
        let s = seeded();
        let state = QueueViewState::new(QueueFilter::All, 1);
        let view = QueueView::build(&s.board, state, &s.moderator, &VisibilityPolicy::default(), 25)
            .unwrap();

        assert_eq!(view.rows.items.len(), 2);
        let pending = view.rows.items.iter().find(|r| r.id == s.pending).unwrap();
        assert_eq!(
            pending.review_href.as_deref(),
            Some("/moderation/comments/1/review?filter=all&page=1")
        );
        assert!(pending.hide_href.is_some());
        assert_eq!(pending.author, "alice");
        assert_eq!(pending.thread_href, "/debates/1");
        assert_eq!(pending.commentable_title, "Debate #1");

        let reviewed = view.rows.items.iter().find(|r| r.id == s.reviewed).unwrap();
        assert!(reviewed.review_href.is_none());
        assert!(reviewed.hide_href.is_some());
    }

    #[test]
    fn test_pagination_links() {
        let mut s = seeded();
        let alice = Viewer::citizen(UserId(2));
        let bob = Viewer::citizen(UserId(3));
        let mut service = ModerationService::new(&mut s.board);
        for n in 0..4 {
            let id = service
                .post(&alice, CommentableRef::debate(2), None, &format!("extra {}", n))
                .unwrap();
            service.flag(&bob, id).unwrap();
        }

        let state = QueueViewState::new(QueueFilter::PendingReview, 2);
        let view = QueueView::build(&s.board, state, &s.moderator, &VisibilityPolicy::default(), 2)
            .unwrap();

        assert_eq!(view.rows.total_items, 5);
        assert_eq!(view.rows.items.len(), 2);
        assert_eq!(
            view.prev_href.as_deref(),
            Some("/moderation/comments?filter=pending_review&page=1")
        );
        assert_eq!(
            view.next_href.as_deref(),
            Some("/moderation/comments?filter=pending_review&page=3")
        );
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let s = seeded();
        let state = QueueViewState::new(QueueFilter::All, 7);
        let view = QueueView::build(&s.board, state, &s.moderator, &VisibilityPolicy::default(), 25)
            .unwrap();
        assert!(view.is_empty());
        assert_eq!(view.state.page, 7);
        assert!(view.next_href.is_none());
        assert_eq!(
            view.prev_href.as_deref(),
            Some("/moderation/comments?filter=all&page=1")
        );
    }

    #[test]
    fn test_own_comment_has_no_moderation_links() {
        let mut s = seeded();
        let bob = Viewer::citizen(UserId(3));
        let mut service = ModerationService::new(&mut s.board);
        let own = service
            .post(&s.moderator, CommentableRef::debate(1), None, "my own")
            .unwrap();
        service.flag(&bob, own).unwrap();

        let view = QueueView::build(
            &s.board,
            QueueViewState::default(),
            &s.moderator,
            &VisibilityPolicy::default(),
            25,
        )
        .unwrap();
        let row = view.rows.items.iter().find(|r| r.id == own).unwrap();
        assert!(row.hide_href.is_none());
        assert!(row.ban_href.is_none());
        assert!(row.review_href.is_none());
    }
}
