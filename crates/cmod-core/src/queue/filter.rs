//! Queue filters, ordering and navigation links

use crate::comment::{Comment, ModerationStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation queue filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueFilter {
    /// Flagged and not hidden, reviewed or not
    All,
    /// Flagged, neither hidden nor reviewed
    #[default]
    PendingReview,
    /// Flagged and reviewed, not hidden
    Reviewed,
}

impl QueueFilter {
    /// Filters in navigation order
    pub const ALL: [QueueFilter; 3] = [
        QueueFilter::All,
        QueueFilter::PendingReview,
        QueueFilter::Reviewed,
    ];

    /// Query-string value
    pub fn as_param(&self) -> &'static str {
        match self {
            QueueFilter::All => "all",
            QueueFilter::PendingReview => "pending_review",
            QueueFilter::Reviewed => "reviewed",
        }
    }

    /// Navigation label
    pub fn label(&self) -> &'static str {
        match self {
            QueueFilter::All => "All",
            QueueFilter::PendingReview => "Pending",
            QueueFilter::Reviewed => "Reviewed",
        }
    }

    /// Strict parse of a query-string value
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "all" => Some(QueueFilter::All),
            "pending_review" => Some(QueueFilter::PendingReview),
            "reviewed" => Some(QueueFilter::Reviewed),
            _ => None,
        }
    }

    /// Lenient parse: missing or unknown values give the default filter
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(Self::parse).unwrap_or_default()
    }

    /// Whether a comment belongs in the queue under this filter.
    ///
    /// Hidden comments are excluded from every filter, so `All` is exactly
    /// the union of the other two.
    pub fn matches(&self, comment: &Comment) -> bool {
        match (self, comment.status()) {
            (QueueFilter::All, ModerationStatus::PendingReview | ModerationStatus::Reviewed) => {
                true
            }
            (QueueFilter::PendingReview, ModerationStatus::PendingReview) => true,
            (QueueFilter::Reviewed, ModerationStatus::Reviewed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for QueueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

/// Queue ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOrder {
    /// Creation order
    #[default]
    Created,
    /// Most flagged first, ties in creation order
    Flags,
}

impl QueueOrder {
    pub const ALL: [QueueOrder; 2] = [QueueOrder::Created, QueueOrder::Flags];

    pub fn as_param(&self) -> &'static str {
        match self {
            QueueOrder::Created => "created",
            QueueOrder::Flags => "flags",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QueueOrder::Created => "Oldest first",
            QueueOrder::Flags => "Most flagged",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "created" => Some(QueueOrder::Created),
            "flags" => Some(QueueOrder::Flags),
            _ => None,
        }
    }

    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(Self::parse).unwrap_or_default()
    }

    /// Sort comments in place. Input must already be in creation order.
    pub fn sort(&self, comments: &mut [&Comment]) {
        match self {
            QueueOrder::Created => comments.sort_by_key(|c| c.id),
            QueueOrder::Flags => {
                comments.sort_by(|a, b| {
                    b.flags_count()
                        .cmp(&a.flags_count())
                        .then_with(|| a.id.cmp(&b.id))
                });
            }
        }
    }
}

impl fmt::Display for QueueOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

/// Filters shown in the queue navigation: every filter except the active one
pub fn nav_filters(active: QueueFilter) -> Vec<QueueFilter> {
    QueueFilter::ALL
        .into_iter()
        .filter(|f| *f != active)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::model::test_comment;
    use crate::types::UserId;

    #[test]
    fn test_default_is_pending_review() {
        assert_eq!(QueueFilter::default(), QueueFilter::PendingReview);
        assert_eq!(QueueFilter::from_param(None), QueueFilter::PendingReview);
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        assert_eq!(QueueFilter::from_param(Some("bogus")), QueueFilter::PendingReview);
        assert_eq!(QueueFilter::from_param(Some("")), QueueFilter::PendingReview);
        assert_eq!(QueueFilter::from_param(Some("reviewed")), QueueFilter::Reviewed);
    }

    #[test]
    fn test_param_round_trip() {
        for filter in QueueFilter::ALL {
            assert_eq!(QueueFilter::parse(filter.as_param()), Some(filter));
        }
        for order in QueueOrder::ALL {
            assert_eq!(QueueOrder::parse(order.as_param()), Some(order));
        }
    }

    #[test]
    fn test_nav_omits_active_filter() {
        for active in QueueFilter::ALL {
            let nav = nav_filters(active);
            assert_eq!(nav.len(), 2);
            assert!(!nav.contains(&active));
        }
        let labels: Vec<_> = nav_filters(QueueFilter::default())
            .iter()
            .map(|f| f.label())
            .collect();
        assert_eq!(labels, vec!["All", "Reviewed"]);
    }

    #[test]
    fn test_unflagged_comment_matches_nothing() {
        let comment = test_comment(1, 1);
        for filter in QueueFilter::ALL {
            assert!(!filter.matches(&comment));
        }
    }

    #[test]
    fn test_pending_comment_membership() {
        let mut comment = test_comment(1, 1);
        comment.add_flag(UserId(2));

        assert!(QueueFilter::PendingReview.matches(&comment));
        assert!(QueueFilter::All.matches(&comment));
        assert!(!QueueFilter::Reviewed.matches(&comment));
    }

    #[test]
    fn test_reviewed_comment_membership() {
        let mut comment = test_comment(1, 1);
        comment.add_flag(UserId(2));
        comment.mark_reviewed();

        assert!(!QueueFilter::PendingReview.matches(&comment));
        assert!(QueueFilter::All.matches(&comment));
        assert!(QueueFilter::Reviewed.matches(&comment));
    }

    #[test]
    fn test_hidden_comment_matches_nothing() {
        let mut comment = test_comment(1, 1);
        comment.add_flag(UserId(2));
        comment.hide();
        for filter in QueueFilter::ALL {
            assert!(!filter.matches(&comment));
        }

        comment.mark_reviewed();
        for filter in QueueFilter::ALL {
            assert!(!filter.matches(&comment));
        }
    }

    #[test]
    fn test_flags_order_breaks_ties_by_creation() {
        let mut a = test_comment(1, 1);
        let mut b = test_comment(2, 1);
        let mut c = test_comment(3, 1);
        a.add_flag(UserId(5));
        b.add_flag(UserId(5));
        b.add_flag(UserId(6));
        c.add_flag(UserId(5));

        let mut comments = vec![&a, &b, &c];
        QueueOrder::Flags.sort(&mut comments);
        let ids: Vec<_> = comments.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
