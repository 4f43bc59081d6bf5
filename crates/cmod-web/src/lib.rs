//! cmod-web - server-rendered moderation pages
//!
//! Exposes the moderation queue, the action endpoints and the comment
//! threads of debates, proposals and polls over HTTP. The acting user is
//! read from the `X-User-Id` header.

pub mod routes;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use cmod_core::account::Viewer;
use cmod_core::board::{Board, BoardStorage};
use cmod_core::config::Config;
use cmod_core::policy::VisibilityPolicy;
use cmod_core::types::UserId;
use cmod_core::ModerationError;
use std::sync::Arc;
use tera::Tera;
use tokio::sync::RwLock;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{debug, error};

/// Header carrying the acting user's id
pub const USER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<RwLock<Board>>,
    pub storage: Arc<dyn BoardStorage>,
    pub tera: Arc<Tera>,
    pub policy: VisibilityPolicy,
    pub per_page: usize,
}

impl AppState {
    pub fn new(board: Board, storage: Arc<dyn BoardStorage>, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            board: Arc::new(RwLock::new(board)),
            storage,
            tera: Arc::new(templates()?),
            policy: VisibilityPolicy::new(config.moderation.placeholder.clone()),
            per_page: config.moderation.per_page,
        })
    }
}

/// Page templates, compiled into the binary
pub fn templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("queue.html", include_str!("../templates/queue.html")),
        ("thread.html", include_str!("../templates/thread.html")),
    ])?;
    Ok(tera)
}

/// Viewer for the request. Missing, malformed, unknown and banned ids all
/// give the anonymous viewer.
pub fn viewer_from_headers(board: &Board, headers: &HeaderMap) -> Viewer {
    let id = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<UserId>().ok());
    board.accounts.viewer_for(id)
}

#[derive(Debug)]
pub struct AppError {
    pub status_code: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<ModerationError> for AppError {
    fn from(err: ModerationError) -> Self {
        let status_code =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        AppError {
            status_code,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Internal server error: {}", err),
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Template rendering error: {}", err),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            error!("{}", self.message);
        } else {
            debug!("{} {}", self.status_code, self.message);
        }
        (self.status_code, Html(error_page(self.status_code, &self.message))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{code} - {reason}</title>
</head>
<body>
    <h1 class="error">{code} - {reason}</h1>
    <p>{message}</p>
    <p><a href="/moderation/comments">Back to the moderation queue</a></p>
</body>
</html>
"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = tera::escape_html(message),
    )
}

// Health check endpoint
async fn health() -> impl IntoResponse {
    "OK"
}

// Fallback handler for 404s
async fn not_found() -> impl IntoResponse {
    AppError::not_found("Page not found")
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/moderation/comments", get(routes::queue_html))
        .route("/moderation/comments/bulk", post(routes::bulk_action))
        .route("/moderation/comments/:id/hide", post(routes::hide_comment))
        .route("/moderation/comments/:id/review", post(routes::review_comment))
        .route("/moderation/comments/:id/ban_author", post(routes::ban_author))
        .route("/debates/:id", get(routes::debate_thread))
        .route("/proposals/:id", get(routes::proposal_thread))
        .route("/polls/:id", get(routes::poll_thread))
        .route("/comments/:id/flag", post(routes::flag_comment))
        .route("/comments/:id/unflag", post(routes::unflag_comment))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .with_state(state)
}
