//! Queue view state carried through query strings
//!
//! `filter`, `page` and `order` live in the URL. The web layer extracts
//! them and hands the raw values to [`QueueViewState::from_params`]; they
//! are written back out when building links and post-action redirects.

use super::filter::{QueueFilter, QueueOrder};
use crate::moderation::ModerationAction;
use crate::types::CommentId;
use serde::{Deserialize, Serialize};

/// Path of the moderation queue
pub const QUEUE_PATH: &str = "/moderation/comments";

/// Filter, page and order of the moderation queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueViewState {
    pub filter: QueueFilter,
    /// 1-based page number
    pub page: usize,
    pub order: QueueOrder,
}

impl Default for QueueViewState {
    fn default() -> Self {
        Self {
            filter: QueueFilter::default(),
            page: 1,
            order: QueueOrder::default(),
        }
    }
}

impl QueueViewState {
    pub fn new(filter: QueueFilter, page: usize) -> Self {
        Self {
            filter,
            page: page.max(1),
            order: QueueOrder::default(),
        }
    }

    /// Build from raw parameter values. Unknown or malformed values fall
    /// back to their defaults instead of failing.
    pub fn from_params(filter: Option<&str>, page: Option<&str>, order: Option<&str>) -> Self {
        Self {
            filter: QueueFilter::from_param(filter),
            page: parse_page(page),
            order: QueueOrder::from_param(order),
        }
    }

    /// Query string without the leading `?`.
    ///
    /// `filter` and `page` are always present; `order` only when not the
    /// default.
    pub fn to_query(&self) -> String {
        let mut query = format!("filter={}&page={}", self.filter.as_param(), self.page);
        if self.order != QueueOrder::default() {
            query.push_str("&order=");
            query.push_str(self.order.as_param());
        }
        query
    }

    /// Queue URL for this state
    pub fn href(&self) -> String {
        format!("{}?{}", QUEUE_PATH, self.to_query())
    }

    /// Endpoint for an action on a queue row. The query carries this state
    /// so the redirect can return to it.
    pub fn action_href(&self, id: CommentId, action: ModerationAction) -> String {
        format!(
            "{}/{}/{}?{}",
            QUEUE_PATH,
            id,
            action.path_segment(),
            self.to_query()
        )
    }

    /// Switch filter, restarting at page 1
    pub fn with_filter(self, filter: QueueFilter) -> Self {
        Self {
            filter,
            page: 1,
            ..self
        }
    }

    /// Switch order, restarting at page 1
    pub fn with_order(self, order: QueueOrder) -> Self {
        Self {
            order,
            page: 1,
            ..self
        }
    }

    /// Go to a page, keeping filter and order
    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }
}

fn parse_page(page: Option<&str>) -> usize {
    page.and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}
