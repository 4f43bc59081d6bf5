//! Visibility policy
//!
//! Pure read-time decisions about what a viewer may see and do with a
//! comment. Nothing here mutates state.

use crate::account::Viewer;
use crate::comment::{Comment, ModerationStatus};
use crate::config::DEFAULT_PLACEHOLDER;
use serde::{Deserialize, Serialize};

/// Whether the viewer may hide the comment or ban its author.
///
/// Moderators may act on everyone's comments except their own.
pub fn can_moderate(viewer: &Viewer, comment: &Comment) -> bool {
    viewer.is_moderator() && !viewer.is(comment.author_id)
}

/// Whether the viewer may flag the comment as inappropriate
pub fn can_flag(viewer: &Viewer, comment: &Comment) -> bool {
    match viewer.id {
        Some(id) => {
            !comment.is_hidden() && !comment.is_authored_by(id) && !comment.has_flag_from(id)
        }
        None => false,
    }
}

/// Whether the viewer may withdraw their flag.
///
/// Flags are settled once the comment is hidden or reviewed.
pub fn can_unflag(viewer: &Viewer, comment: &Comment) -> bool {
    match viewer.id {
        Some(id) => !comment.is_hidden() && !comment.is_reviewed() && comment.has_flag_from(id),
        None => false,
    }
}

/// Body text as presented to a viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedBody {
    /// Text to display
    pub text: String,
    /// Rendered with the faded affordance (moderator looking at hidden content)
    pub faded: bool,
    /// Real body replaced by the placeholder
    pub redacted: bool,
}

/// Actions the UI offers to a viewer on a comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentActions {
    pub hide: bool,
    pub ban_author: bool,
    pub mark_reviewed: bool,
    pub flag: bool,
    pub unflag: bool,
}

impl CommentActions {
    /// Whether any moderation action is offered
    pub fn any_moderation(&self) -> bool {
        self.hide || self.ban_author || self.mark_reviewed
    }
}

/// Visibility policy with a configurable placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    placeholder: String,
}

impl VisibilityPolicy {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Body as the viewer should see it
    pub fn visible_body(&self, viewer: &Viewer, comment: &Comment) -> RenderedBody {
        if !comment.is_hidden() {
            return RenderedBody {
                text: comment.body.clone(),
                faded: false,
                redacted: false,
            };
        }

        if viewer.is_moderator() {
            RenderedBody {
                text: comment.body.clone(),
                faded: true,
                redacted: false,
            }
        } else {
            RenderedBody {
                text: self.placeholder.clone(),
                faded: false,
                redacted: true,
            }
        }
    }

    /// Action links to render for the viewer
    pub fn available_actions(&self, viewer: &Viewer, comment: &Comment) -> CommentActions {
        let moderate = can_moderate(viewer, comment);
        CommentActions {
            hide: moderate && !comment.is_hidden(),
            ban_author: moderate,
            mark_reviewed: moderate && comment.status() == ModerationStatus::PendingReview,
            flag: can_flag(viewer, comment),
            unflag: can_unflag(viewer, comment),
        }
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

/// [`VisibilityPolicy::visible_body`] with the default placeholder
pub fn visible_body(viewer: &Viewer, comment: &Comment) -> RenderedBody {
    VisibilityPolicy::default().visible_body(viewer, comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::model::test_comment;
    use crate::types::UserId;
    use pretty_assertions::assert_eq;

    const AUTHOR: UserId = UserId(1);
    const MODERATOR: UserId = UserId(2);
    const CITIZEN: UserId = UserId(3);

    #[test]
    fn moderator_can_moderate_others_comments() {
        let comment = test_comment(1, AUTHOR.0);
        assert!(can_moderate(&Viewer::moderator(MODERATOR), &comment));
    }

    #[test]
    fn moderator_cannot_moderate_own_comment() {
        let comment = test_comment(1, MODERATOR.0);
        assert!(!can_moderate(&Viewer::moderator(MODERATOR), &comment));
    }

    #[test]
    fn citizens_and_anonymous_cannot_moderate() {
        let comment = test_comment(1, AUTHOR.0);
        assert!(!can_moderate(&Viewer::citizen(CITIZEN), &comment));
        assert!(!can_moderate(&Viewer::citizen(AUTHOR), &comment));
        assert!(!can_moderate(&Viewer::anonymous(), &comment));
    }

    #[test]
    fn moderation_rule_holds_for_every_author() {
        for author in 1..=5 {
            let comment = test_comment(author, author);
            for moderator in 1..=5 {
                let expected = author != moderator;
                assert_eq!(
                    can_moderate(&Viewer::moderator(UserId(moderator)), &comment),
                    expected
                );
            }
        }
    }

    #[test]
    fn visible_body_not_hidden() {
        let comment = test_comment(1, AUTHOR.0);
        for viewer in [
            Viewer::anonymous(),
            Viewer::citizen(CITIZEN),
            Viewer::moderator(MODERATOR),
        ] {
            let body = visible_body(&viewer, &comment);
            assert_eq!(body.text, "Comment 1");
            assert!(!body.faded);
            assert!(!body.redacted);
        }
    }

    #[test]
    fn visible_body_hidden_for_citizen_is_placeholder() {
        let mut comment = test_comment(1, AUTHOR.0);
        comment.hide();

        let body = visible_body(&Viewer::citizen(CITIZEN), &comment);
        assert_eq!(body.text, "This comment has been deleted");
        assert!(body.redacted);

        let own = visible_body(&Viewer::citizen(AUTHOR), &comment);
        assert_eq!(own.text, "This comment has been deleted");
    }

    #[test]
    fn visible_body_hidden_for_moderator_is_faded() {
        let mut comment = test_comment(1, AUTHOR.0);
        comment.hide();

        let body = visible_body(&Viewer::moderator(MODERATOR), &comment);
        assert_eq!(
            body,
            RenderedBody {
                text: "Comment 1".to_string(),
                faded: true,
                redacted: false,
            }
        );
    }

    #[test]
    fn custom_placeholder() {
        let policy = VisibilityPolicy::new("[removed]");
        let mut comment = test_comment(1, AUTHOR.0);
        comment.hide();
        assert_eq!(policy.visible_body(&Viewer::anonymous(), &comment).text, "[removed]");
    }

    #[test]
    fn actions_for_moderator_on_pending_comment() {
        let policy = VisibilityPolicy::default();
        let mut comment = test_comment(1, AUTHOR.0);
        comment.add_flag(CITIZEN);

        let actions = policy.available_actions(&Viewer::moderator(MODERATOR), &comment);
        assert_eq!(
            actions,
            CommentActions {
                hide: true,
                ban_author: true,
                mark_reviewed: true,
                flag: true,
                unflag: false,
            }
        );
    }

    #[test]
    fn actions_for_moderator_on_own_comment() {
        let policy = VisibilityPolicy::default();
        let mut comment = test_comment(1, MODERATOR.0);
        comment.add_flag(CITIZEN);

        let actions = policy.available_actions(&Viewer::moderator(MODERATOR), &comment);
        assert!(!actions.any_moderation());
        assert!(!actions.flag);
    }

    #[test]
    fn actions_on_hidden_comment() {
        let policy = VisibilityPolicy::default();
        let mut comment = test_comment(1, AUTHOR.0);
        comment.hide();

        let actions = policy.available_actions(&Viewer::moderator(MODERATOR), &comment);
        assert!(!actions.hide);
        assert!(actions.ban_author);
        assert!(!actions.flag);
    }

    #[test]
    fn flag_and_unflag_for_citizen() {
        let policy = VisibilityPolicy::default();
        let mut comment = test_comment(1, AUTHOR.0);

        let viewer = Viewer::citizen(CITIZEN);
        let before = policy.available_actions(&viewer, &comment);
        assert!(before.flag && !before.unflag);

        comment.add_flag(CITIZEN);
        let after = policy.available_actions(&viewer, &comment);
        assert!(!after.flag && after.unflag);
        assert!(!after.any_moderation());
    }

    #[test]
    fn reviewed_flags_cannot_be_withdrawn() {
        let mut comment = test_comment(1, AUTHOR.0);
        comment.add_flag(CITIZEN);
        comment.mark_reviewed();

        assert!(!can_unflag(&Viewer::citizen(CITIZEN), &comment));
        assert_eq!(comment.status(), ModerationStatus::Reviewed);
    }

    #[test]
    fn anonymous_cannot_flag() {
        let comment = test_comment(1, AUTHOR.0);
        assert!(!can_flag(&Viewer::anonymous(), &comment));
        assert!(!can_flag(&Viewer::citizen(AUTHOR), &comment));
    }
}
