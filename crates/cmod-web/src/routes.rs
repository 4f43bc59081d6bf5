use crate::{viewer_from_headers, AppError, AppResult, AppState};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect},
    Form,
};
use cmod_core::moderation::{redirect_location, ModerationAction, ModerationService};
use cmod_core::policy::RenderedBody;
use cmod_core::queue::{QueueView, QueueViewState};
use cmod_core::thread::{ThreadNode, ThreadView};
use cmod_core::types::{CommentId, CommentableKind, CommentableRef};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Queue state as it arrives in the query string.
///
/// Values stay raw strings so that bad input falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct QueueParams {
    pub filter: Option<String>,
    pub page: Option<String>,
    pub order: Option<String>,
}

impl QueueParams {
    pub fn state(&self) -> QueueViewState {
        QueueViewState::from_params(
            self.filter.as_deref(),
            self.page.as_deref(),
            self.order.as_deref(),
        )
    }
}

/// Path ids that do not parse cannot name a comment
fn parse_comment_id(raw: &str) -> AppResult<CommentId> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("Comment not found: {}", raw)))
}

/// Moderation queue - HTML response
pub async fn queue_html(
    State(state): State<AppState>,
    Query(params): Query<QueueParams>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let queue_state = params.state();
    let board = state.board.read().await;
    let viewer = viewer_from_headers(&board, &headers);
    debug!("Handling queue for {:?}: {:?}", viewer, queue_state);

    let view = QueueView::build(&board, queue_state, &viewer, &state.policy, state.per_page)?;

    let mut context = tera::Context::new();
    context.insert("view", &view);
    context.insert("query", &queue_state.to_query());
    context.insert("viewer_id", &viewer.id);
    Ok(Html(state.tera.render("queue.html", &context)?))
}

pub async fn hide_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueueParams>,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    moderate(state, ModerationAction::Hide, &id, params.state(), &headers).await
}

pub async fn review_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueueParams>,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    moderate(state, ModerationAction::MarkReviewed, &id, params.state(), &headers).await
}

pub async fn ban_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QueueParams>,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    moderate(state, ModerationAction::BanAuthor, &id, params.state(), &headers).await
}

/// Apply one action and send the moderator back to the queue page they
/// came from
async fn moderate(
    state: AppState,
    action: ModerationAction,
    raw_id: &str,
    queue_state: QueueViewState,
    headers: &HeaderMap,
) -> AppResult<Redirect> {
    let id = parse_comment_id(raw_id)?;

    let mut board = state.board.write().await;
    let actor = viewer_from_headers(&board, headers);
    let mut next = (*board).clone();
    let outcome = ModerationService::new(&mut next).apply(action, &actor, id)?;
    if outcome.is_applied() {
        state.storage.save(&next)?;
        *board = next;
    }

    Ok(Redirect::to(&redirect_location(&queue_state)))
}

#[derive(Debug, Deserialize)]
pub struct BulkForm {
    pub action: String,
    /// Comment ids separated by commas or whitespace
    #[serde(default)]
    pub ids: String,
}

/// Apply one action to several comments, all or nothing
pub async fn bulk_action(
    State(state): State<AppState>,
    Query(params): Query<QueueParams>,
    headers: HeaderMap,
    Form(form): Form<BulkForm>,
) -> AppResult<Redirect> {
    let queue_state = params.state();
    let action = ModerationAction::parse(&form.action).ok_or_else(|| AppError {
        status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: format!("Unknown action: {}", form.action),
    })?;
    let ids = form
        .ids
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<CommentId>().map_err(AppError::from))
        .collect::<AppResult<Vec<_>>>()?;

    let mut board = state.board.write().await;
    let actor = viewer_from_headers(&board, &headers);
    let mut next = (*board).clone();
    let outcomes = ModerationService::new(&mut next).bulk(action, &ids, &actor)?;
    if outcomes.iter().any(|o| o.is_applied()) {
        state.storage.save(&next)?;
        *board = next;
    }
    info!("Bulk {} on {} comments", action, ids.len());

    Ok(Redirect::to(&redirect_location(&queue_state)))
}

/// One comment of a thread page, flattened with its depth
#[derive(Debug, Serialize)]
struct ThreadRow<'a> {
    depth: usize,
    id: CommentId,
    author: &'a str,
    body: &'a RenderedBody,
    created_at: String,
    flags_count: Option<usize>,
    hide_href: Option<&'a str>,
    ban_href: Option<&'a str>,
    flag_href: Option<&'a str>,
    unflag_href: Option<&'a str>,
}

impl<'a> ThreadRow<'a> {
    fn new(depth: usize, node: &'a ThreadNode) -> Self {
        Self {
            depth,
            id: node.id,
            author: &node.author,
            body: &node.body,
            created_at: node.created_at.format("%Y-%m-%d %H:%M").to_string(),
            flags_count: node.flags_count,
            hide_href: node.hide_href.as_deref(),
            ban_href: node.ban_href.as_deref(),
            flag_href: node.flag_href.as_deref(),
            unflag_href: node.unflag_href.as_deref(),
        }
    }
}

async fn thread_html(
    state: AppState,
    commentable: CommentableRef,
    headers: &HeaderMap,
) -> AppResult<Html<String>> {
    let board = state.board.read().await;
    let viewer = viewer_from_headers(&board, headers);
    debug!("Handling thread {} for {:?}", commentable, viewer);

    let view = ThreadView::build(&board, commentable, &viewer, &state.policy);
    let rows: Vec<ThreadRow> = view
        .flatten()
        .into_iter()
        .map(|(depth, node)| ThreadRow::new(depth, node))
        .collect();

    let mut context = tera::Context::new();
    context.insert("title", &commentable.to_string());
    context.insert("rows", &rows);
    context.insert("total", &view.count());
    context.insert("is_moderator", &viewer.is_moderator());
    Ok(Html(state.tera.render("thread.html", &context)?))
}

pub async fn debate_thread(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    thread_html(state, CommentableRef::new(CommentableKind::Debate, id), &headers).await
}

pub async fn proposal_thread(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    thread_html(state, CommentableRef::new(CommentableKind::Proposal, id), &headers).await
}

pub async fn poll_thread(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    thread_html(state, CommentableRef::new(CommentableKind::Poll, id), &headers).await
}

pub async fn flag_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    report(state, &id, &headers, true).await
}

pub async fn unflag_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Redirect> {
    report(state, &id, &headers, false).await
}

/// Add or withdraw the viewer's flag, then return to the thread
async fn report(
    state: AppState,
    raw_id: &str,
    headers: &HeaderMap,
    flag: bool,
) -> AppResult<Redirect> {
    let id = parse_comment_id(raw_id)?;

    let mut board = state.board.write().await;
    let reporter = viewer_from_headers(&board, headers);
    let commentable = board.comments.require(id)?.commentable;

    let mut next = (*board).clone();
    let mut service = ModerationService::new(&mut next);
    if flag {
        service.flag(&reporter, id)?;
    } else {
        service.unflag(&reporter, id)?;
    }
    state.storage.save(&next)?;
    *board = next;

    Ok(Redirect::to(&commentable.path()))
}
