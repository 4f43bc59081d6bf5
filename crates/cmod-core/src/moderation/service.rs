//! Moderation service operating on a board

use super::{ActionOutcome, ModerationAction};
use crate::account::Viewer;
use crate::activity::{ActivityAction, ActivityTarget};
use crate::board::Board;
use crate::comment::{Comment, CommentBuilder, CommentValidator};
use crate::config::ModerationConfig;
use crate::error::{ModerationError, Result};
use crate::policy::can_moderate;
use crate::types::{CommentId, CommentableRef, UserId};
use tracing::{debug, info};

/// Applies moderation and posting operations to a borrowed board.
///
/// Errors are checked in a fixed order: a missing comment is reported
/// before a missing permission.
pub struct ModerationService<'a> {
    board: &'a mut Board,
    validator: CommentValidator,
}

impl<'a> ModerationService<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Self {
            board,
            validator: CommentValidator::new(),
        }
    }

    /// Use the body length limit from configuration
    pub fn with_config(board: &'a mut Board, config: &ModerationConfig) -> Self {
        Self {
            board,
            validator: CommentValidator::with_max_length(config.max_body_length),
        }
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    /// Post a comment, optionally as a reply
    pub fn post(
        &mut self,
        author: &Viewer,
        commentable: CommentableRef,
        parent: Option<CommentId>,
        body: &str,
    ) -> Result<CommentId> {
        let author_id = author.require_id()?;
        let account = self.board.accounts.require(author_id)?;
        if account.is_banned() {
            return Err(ModerationError::Unauthorized(format!(
                "user {} is banned",
                account.username
            )));
        }

        let mut draft = CommentBuilder::new(commentable, author_id).body(body);
        let parent_comment = match parent {
            Some(parent_id) => {
                draft = draft.reply_to(parent_id);
                Some(self.board.comments.require(parent_id)?)
            }
            None => None,
        };
        self.validator.validate(&draft, parent_comment)?;

        let id = self.board.comments.create(draft)?;
        self.board.touch();
        info!("User {} posted comment {} on {}", author_id, id, commentable);
        Ok(id)
    }

    /// Flag a comment as inappropriate
    pub fn flag(&mut self, reporter: &Viewer, id: CommentId) -> Result<()> {
        let comment = self.board.comments.require_mut(id)?;
        let reporter_id = reporter.require_id()?;

        if comment.is_authored_by(reporter_id) {
            return Err(ModerationError::Unauthorized(
                "you cannot flag your own comment".to_string(),
            ));
        }
        if comment.is_hidden() {
            return Err(ModerationError::InvalidTransition(format!(
                "comment {} is hidden",
                id
            )));
        }
        if !comment.add_flag(reporter_id) {
            return Err(ModerationError::InvalidTransition(format!(
                "comment {} is already flagged by you",
                id
            )));
        }

        self.board.touch();
        info!("User {} flagged comment {}", reporter_id, id);
        Ok(())
    }

    /// Withdraw a flag
    pub fn unflag(&mut self, reporter: &Viewer, id: CommentId) -> Result<()> {
        let comment = self.board.comments.require_mut(id)?;
        let reporter_id = reporter.require_id()?;

        if comment.is_hidden() {
            return Err(ModerationError::InvalidTransition(format!(
                "comment {} is hidden",
                id
            )));
        }
        if comment.is_reviewed() {
            return Err(ModerationError::InvalidTransition(format!(
                "comment {} has already been reviewed",
                id
            )));
        }
        if !comment.remove_flag(reporter_id) {
            return Err(ModerationError::InvalidTransition(format!(
                "comment {} is not flagged by you",
                id
            )));
        }

        self.board.touch();
        info!("User {} unflagged comment {}", reporter_id, id);
        Ok(())
    }

    /// Hide a comment. Hiding twice is a no-op.
    pub fn hide(&mut self, actor: &Viewer, id: CommentId) -> Result<ActionOutcome> {
        let actor_id = self.check(ModerationAction::Hide, actor, id)?;

        let changed = self.board.comments.require_mut(id)?.hide();
        if changed {
            self.record(actor_id, ActivityAction::HideComment, ActivityTarget::Comment(id));
            info!("Moderator {} hid comment {}", actor_id, id);
        } else {
            debug!("Comment {} already hidden", id);
        }
        Ok(ActionOutcome::from_changed(changed))
    }

    /// Dismiss the flags on a comment without hiding it
    pub fn mark_reviewed(&mut self, actor: &Viewer, id: CommentId) -> Result<ActionOutcome> {
        let actor_id = self.check(ModerationAction::MarkReviewed, actor, id)?;

        let changed = self.board.comments.require_mut(id)?.mark_reviewed();
        if changed {
            self.record(actor_id, ActivityAction::MarkReviewed, ActivityTarget::Comment(id));
            info!("Moderator {} marked comment {} reviewed", actor_id, id);
        } else {
            debug!("Comment {} already reviewed", id);
        }
        Ok(ActionOutcome::from_changed(changed))
    }

    /// Ban the author of a comment
    pub fn ban_author(&mut self, actor: &Viewer, id: CommentId) -> Result<ActionOutcome> {
        let actor_id = self.check(ModerationAction::BanAuthor, actor, id)?;
        let author_id = self.board.comments.require(id)?.author_id;

        let changed = self.board.accounts.require_mut(author_id)?.ban(actor_id);
        if changed {
            self.record(actor_id, ActivityAction::BanUser, ActivityTarget::User(author_id));
            info!(
                "Moderator {} banned user {} (comment {})",
                actor_id, author_id, id
            );
        } else {
            debug!("User {} already banned", author_id);
        }
        Ok(ActionOutcome::from_changed(changed))
    }

    /// Apply a single moderation action
    pub fn apply(
        &mut self,
        action: ModerationAction,
        actor: &Viewer,
        id: CommentId,
    ) -> Result<ActionOutcome> {
        match action {
            ModerationAction::Hide => self.hide(actor, id),
            ModerationAction::MarkReviewed => self.mark_reviewed(actor, id),
            ModerationAction::BanAuthor => self.ban_author(actor, id),
        }
    }

    /// Apply one action to many comments, all or nothing.
    ///
    /// Every id is checked before any change is made.
    pub fn bulk(
        &mut self,
        action: ModerationAction,
        ids: &[CommentId],
        actor: &Viewer,
    ) -> Result<Vec<ActionOutcome>> {
        if ids.is_empty() {
            return Err(ModerationError::Validation(
                "no comments selected".to_string(),
            ));
        }

        for &id in ids {
            self.check(action, actor, id)
                .map_err(|e| e.with_context(format!("bulk {} aborted", action)))?;
        }

        let outcomes = ids
            .iter()
            .map(|&id| self.apply(action, actor, id))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Bulk {} on {} comments ({} changed)",
            action,
            ids.len(),
            outcomes.iter().filter(|o| o.is_applied()).count()
        );
        Ok(outcomes)
    }

    /// Everything that must hold before `action` may run on `id`.
    /// Returns the acting moderator's id.
    fn check(&self, action: ModerationAction, actor: &Viewer, id: CommentId) -> Result<UserId> {
        let comment = self.board.comments.require(id)?;
        let actor_id = authorize(actor, comment)?;

        match action {
            ModerationAction::Hide => {}
            ModerationAction::MarkReviewed => {
                if !comment.is_flagged() {
                    return Err(ModerationError::InvalidTransition(format!(
                        "comment {} has no flags to review",
                        id
                    )));
                }
            }
            ModerationAction::BanAuthor => {
                self.board.accounts.require(comment.author_id)?;
            }
        }

        Ok(actor_id)
    }

    fn record(&mut self, actor_id: UserId, action: ActivityAction, target: ActivityTarget) {
        self.board.activity.record(actor_id, action, target);
        self.board.touch();
    }
}

fn authorize(actor: &Viewer, comment: &Comment) -> Result<UserId> {
    let actor_id = actor.require_id()?;
    if !actor.is_moderator() {
        return Err(ModerationError::Unauthorized(
            "moderator role required".to_string(),
        ));
    }
    if !can_moderate(actor, comment) {
        return Err(ModerationError::Unauthorized(
            "moderators cannot act on their own comments".to_string(),
        ));
    }
    Ok(actor_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Role;
    use crate::activity::ActivityAction;
    use crate::comment::ModerationStatus;
    use crate::queue::{QueueFilter, QueueViewState};
    use crate::moderation::redirect_location;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Copy)]
    struct Viewers {
        moderator: Viewer,
        citizen: Viewer,
        other: Viewer,
    }

    fn fixture() -> (Board, Viewers) {
        let mut board = Board::new();
        let moderator = board.accounts.register("mod", Role::Moderator).unwrap();
        let citizen = board.accounts.register("alice", Role::Citizen).unwrap();
        let other = board.accounts.register("bob", Role::Citizen).unwrap();
        let viewers = Viewers {
            moderator: Viewer::moderator(moderator),
            citizen: Viewer::citizen(citizen),
            other: Viewer::citizen(other),
        };
        (board, viewers)
    }

    fn post(board: &mut Board, author: Viewer, body: &str) -> CommentId {
        ModerationService::new(board)
            .post(&author, CommentableRef::debate(1), None, body)
            .unwrap()
    }

    #[test]
    fn test_post_and_reply() {
        let (mut board, v) = fixture();
        let root = post(&mut board, v.citizen, "Root");

        let mut service = ModerationService::new(&mut board);
        let reply = service
            .post(&v.other, CommentableRef::debate(1), Some(root), "Reply")
            .unwrap();

        let reply = board.comments.get(reply).unwrap();
        assert_eq!(reply.parent_id, Some(root));
        assert_eq!(board.comments.get_children(root).len(), 1);
    }

    #[test]
    fn test_post_rejects_anonymous_and_blank() {
        let (mut board, v) = fixture();
        let mut service = ModerationService::new(&mut board);

        let err = service
            .post(&Viewer::anonymous(), CommentableRef::debate(1), None, "hi")
            .unwrap_err();
        assert!(err.is_unauthorized());

        let err = service
            .post(&v.citizen, CommentableRef::debate(1), None, "   ")
            .unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));
    }

    #[test]
    fn test_post_respects_configured_length() {
        let (mut board, v) = fixture();
        let config = ModerationConfig {
            max_body_length: 5,
            ..ModerationConfig::default()
        };
        let mut service = ModerationService::with_config(&mut board, &config);

        assert!(service
            .post(&v.citizen, CommentableRef::debate(1), None, "short")
            .is_ok());
        assert!(service
            .post(&v.citizen, CommentableRef::debate(1), None, "too long")
            .is_err());
    }

    #[test]
    fn test_reply_must_stay_in_thread() {
        let (mut board, v) = fixture();
        let root = post(&mut board, v.citizen, "Root");

        let mut service = ModerationService::new(&mut board);
        let err = service
            .post(&v.other, CommentableRef::debate(2), Some(root), "Reply")
            .unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));

        let err = service
            .post(&v.other, CommentableRef::debate(1), Some(CommentId(99)), "Reply")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_banned_author_cannot_post() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "spam");
        ModerationService::new(&mut board)
            .ban_author(&v.moderator, id)
            .unwrap();

        let err = ModerationService::new(&mut board)
            .post(&v.citizen, CommentableRef::debate(1), None, "more spam")
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_flag_rules() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "Body");
        let mut service = ModerationService::new(&mut board);

        assert!(service.flag(&v.citizen, id).unwrap_err().is_unauthorized());
        assert!(service.flag(&Viewer::anonymous(), id).unwrap_err().is_unauthorized());

        service.flag(&v.other, id).unwrap();
        let err = service.flag(&v.other, id).unwrap_err();
        assert!(matches!(err, ModerationError::InvalidTransition(_)));

        service.unflag(&v.other, id).unwrap();
        let err = service.unflag(&v.other, id).unwrap_err();
        assert!(matches!(err, ModerationError::InvalidTransition(_)));

        assert!(service.flag(&v.other, CommentId(42)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_reviewed_comment_keeps_its_flags() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "Body");
        let mut service = ModerationService::new(&mut board);
        service.flag(&v.other, id).unwrap();
        service.mark_reviewed(&v.moderator, id).unwrap();

        let err = service.unflag(&v.other, id).unwrap_err();
        assert!(matches!(err, ModerationError::InvalidTransition(_)));

        let comment = board.comments.get(id).unwrap();
        assert_eq!(comment.status(), ModerationStatus::Reviewed);
        assert_eq!(comment.flags_count(), 1);
        assert!(QueueFilter::Reviewed.matches(comment));
    }

    #[test]
    fn test_hide_twice_is_idempotent() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "Body");
        let mut service = ModerationService::new(&mut board);

        assert_eq!(service.hide(&v.moderator, id).unwrap(), ActionOutcome::Applied);
        assert_eq!(service.hide(&v.moderator, id).unwrap(), ActionOutcome::Unchanged);

        assert!(board.comments.get(id).unwrap().is_hidden());
        assert_eq!(board.activity.len(), 1);
    }

    #[test]
    fn test_hide_keeps_flags() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "Body");
        let mut service = ModerationService::new(&mut board);
        service.flag(&v.other, id).unwrap();
        service.hide(&v.moderator, id).unwrap();

        let comment = board.comments.get(id).unwrap();
        assert_eq!(comment.flags_count(), 1);
        assert!(!comment.is_reviewed());
        assert_eq!(comment.status(), ModerationStatus::Hidden);
    }

    #[test]
    fn test_non_moderator_cannot_act() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "Body");
        let mut service = ModerationService::new(&mut board);

        for action in ModerationAction::ALL {
            let err = service.apply(action, &v.other, id).unwrap_err();
            assert!(err.is_unauthorized());
            assert_eq!(err.status_code(), 403);
        }
        assert!(!board.comments.get(id).unwrap().is_hidden());
    }

    #[test]
    fn test_moderator_cannot_act_on_own_comment() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.moderator, "Mine");
        let mut service = ModerationService::new(&mut board);

        assert!(service.hide(&v.moderator, id).unwrap_err().is_unauthorized());
        assert!(service.ban_author(&v.moderator, id).unwrap_err().is_unauthorized());
    }

    #[test]
    fn test_missing_comment_is_not_found_before_unauthorized() {
        let (mut board, v) = fixture();
        let mut service = ModerationService::new(&mut board);

        let err = service.hide(&v.other, CommentId(404)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_mark_reviewed_requires_flag() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "Body");
        let mut service = ModerationService::new(&mut board);

        let err = service.mark_reviewed(&v.moderator, id).unwrap_err();
        assert!(matches!(err, ModerationError::InvalidTransition(_)));
        assert_eq!(err.status_code(), 409);

        service.flag(&v.other, id).unwrap();
        assert!(service.mark_reviewed(&v.moderator, id).unwrap().is_applied());
        assert!(!service.mark_reviewed(&v.moderator, id).unwrap().is_applied());

        let comment = board.comments.get(id).unwrap();
        assert_eq!(comment.status(), ModerationStatus::Reviewed);
        assert!(!comment.is_hidden());
    }

    #[test]
    fn test_ban_author() {
        let (mut board, v) = fixture();
        let id = post(&mut board, v.citizen, "Body");
        let author = v.citizen.id.unwrap();
        let mut service = ModerationService::new(&mut board);

        assert!(service.ban_author(&v.moderator, id).unwrap().is_applied());
        assert!(!service.ban_author(&v.moderator, id).unwrap().is_applied());

        let account = board.accounts.get(author).unwrap();
        assert!(account.is_banned());
        assert_eq!(account.banned_by, v.moderator.id);
        assert_eq!(board.accounts.viewer_for(Some(author)), Viewer::anonymous());

        let entries = board.activity.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, ActivityAction::BanUser);
        assert_eq!(entries[0].target, ActivityTarget::User(author));
    }

    #[test]
    fn test_bulk_is_all_or_nothing() {
        let (mut board, v) = fixture();
        let a = post(&mut board, v.citizen, "One");
        let b = post(&mut board, v.moderator, "Two");
        let c = post(&mut board, v.other, "Three");

        let mut service = ModerationService::new(&mut board);
        let err = service
            .bulk(ModerationAction::Hide, &[a, b, c], &v.moderator)
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(board.comments.all().iter().all(|c| !c.is_hidden()));

        let mut service = ModerationService::new(&mut board);
        let outcomes = service
            .bulk(ModerationAction::Hide, &[a, c], &v.moderator)
            .unwrap();
        assert_eq!(outcomes, vec![ActionOutcome::Applied, ActionOutcome::Applied]);
        assert_eq!(board.activity.len(), 2);
    }

    #[test]
    fn test_bulk_review_checks_every_transition() {
        let (mut board, v) = fixture();
        let a = post(&mut board, v.citizen, "One");
        let b = post(&mut board, v.citizen, "Two");

        let mut service = ModerationService::new(&mut board);
        service.flag(&v.other, a).unwrap();

        let err = service
            .bulk(ModerationAction::MarkReviewed, &[a, b], &v.moderator)
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert!(!board.comments.get(a).unwrap().is_reviewed());

        let mut service = ModerationService::new(&mut board);
        assert!(service.bulk(ModerationAction::Hide, &[], &v.moderator).is_err());
    }

    #[test]
    fn test_review_from_second_page_redirects_back() {
        let (mut board, v) = fixture();
        let mut ids = Vec::new();
        for n in 0..4 {
            let id = post(&mut board, v.citizen, &format!("Comment {}", n));
            ModerationService::new(&mut board).flag(&v.other, id).unwrap();
            ids.push(id);
        }

        let state = QueueViewState::new(QueueFilter::PendingReview, 2);
        ModerationService::new(&mut board)
            .mark_reviewed(&v.moderator, ids[3])
            .unwrap();

        assert_eq!(
            redirect_location(&state),
            "/moderation/comments?filter=pending_review&page=2"
        );
    }
}
