//! Browser state and key handling
//!
//! Nothing here touches the terminal, so the whole interaction model can be
//! driven from tests with synthetic key events.

use anyhow::{bail, Result};
use cmod_core::account::Viewer;
use cmod_core::board::{Board, BoardStorage};
use cmod_core::config::Config;
use cmod_core::moderation::{ActionOutcome, ModerationAction, ModerationService};
use cmod_core::policy::VisibilityPolicy;
use cmod_core::queue::{QueueFilter, QueueOrder, QueueRow, QueueView, QueueViewState};
use crossterm::event::{KeyCode, KeyEvent};

/// Application mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the queue
    #[default]
    Normal,
    /// Help overlay
    Help,
    /// Waiting for y/n before applying an action to the selected row
    Confirm(ModerationAction),
}

/// Application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Current mode
    pub mode: AppMode,
    /// Status message
    pub message: Option<String>,
    /// Should quit
    pub should_quit: bool,
    /// Filter, page and order being shown
    pub queue: QueueViewState,
    /// Selected row on the current page
    pub selected: usize,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Advance to the next filter in navigation order
    pub fn next_filter(&mut self) {
        let current = QueueFilter::ALL
            .iter()
            .position(|f| *f == self.queue.filter)
            .unwrap_or(0);
        let next = QueueFilter::ALL[(current + 1) % QueueFilter::ALL.len()];
        self.queue = self.queue.with_filter(next);
        self.selected = 0;
    }

    pub fn toggle_order(&mut self) {
        let order = match self.queue.order {
            QueueOrder::Created => QueueOrder::Flags,
            QueueOrder::Flags => QueueOrder::Created,
        };
        self.queue = self.queue.with_order(order);
        self.selected = 0;
    }

    pub fn next_page(&mut self) {
        self.queue = self.queue.with_page(self.queue.page + 1);
        self.selected = 0;
    }

    pub fn prev_page(&mut self) {
        self.queue = self.queue.with_page(self.queue.page.saturating_sub(1));
        self.selected = 0;
    }

    pub fn select_next(&mut self, row_count: usize) {
        if self.selected + 1 < row_count {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Queue browser: the board, who is looking at it, and the UI state
pub struct Browser {
    pub state: AppState,
    board: Board,
    storage: Box<dyn BoardStorage>,
    viewer: Viewer,
    policy: VisibilityPolicy,
    per_page: usize,
}

impl Browser {
    /// Create a browser for a moderator
    pub fn new(
        board: Board,
        storage: Box<dyn BoardStorage>,
        viewer: Viewer,
        config: &Config,
    ) -> Result<Self> {
        if !viewer.is_moderator() {
            bail!("The queue browser is only available to moderators");
        }

        Ok(Self {
            state: AppState::new(),
            board,
            storage,
            viewer,
            policy: VisibilityPolicy::new(config.moderation.placeholder.clone()),
            per_page: config.moderation.per_page,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Queue page for the current state
    pub fn view(&self) -> Result<QueueView> {
        Ok(QueueView::build(
            &self.board,
            self.state.queue,
            &self.viewer,
            &self.policy,
            self.per_page,
        )?)
    }

    /// Row under the cursor
    pub fn selected_row(&self) -> Option<QueueRow> {
        self.view()
            .ok()?
            .rows
            .items
            .into_iter()
            .nth(self.state.selected)
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.state.mode {
            AppMode::Normal => self.handle_normal_input(key),
            AppMode::Help => {
                self.state.mode = AppMode::Normal;
                Ok(())
            }
            AppMode::Confirm(action) => {
                self.state.mode = AppMode::Normal;
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    self.apply(action)
                } else {
                    self.state.set_message("Cancelled");
                    Ok(())
                }
            }
        }
    }

    fn handle_normal_input(&mut self, key: KeyEvent) -> Result<()> {
        self.state.clear_message();
        let view = self.view()?;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Char('?') => self.state.mode = AppMode::Help,

            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(view.rows.items.len()),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),

            KeyCode::Char('n') | KeyCode::Right => {
                if view.rows.has_next() {
                    self.state.next_page();
                } else {
                    self.state.set_message("Last page");
                }
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if view.rows.has_prev() {
                    self.state.prev_page();
                } else {
                    self.state.set_message("First page");
                }
            }
            KeyCode::Char('f') | KeyCode::Tab => self.state.next_filter(),
            KeyCode::Char('o') => self.state.toggle_order(),

            KeyCode::Char('h') => self.request(ModerationAction::Hide),
            KeyCode::Char('r') => self.request(ModerationAction::MarkReviewed),
            KeyCode::Char('b') => self.request(ModerationAction::BanAuthor),

            _ => {}
        }
        Ok(())
    }

    /// Ask for confirmation if the action is offered on the selected row
    fn request(&mut self, action: ModerationAction) {
        let Some(row) = self.selected_row() else {
            self.state.set_message("Nothing selected");
            return;
        };

        let offered = match action {
            ModerationAction::Hide => row.actions.hide,
            ModerationAction::MarkReviewed => row.actions.mark_reviewed,
            ModerationAction::BanAuthor => row.actions.ban_author,
        };
        if offered {
            self.state.mode = AppMode::Confirm(action);
        } else {
            self.state
                .set_message(format!("{} is not available for comment {}", action.label(), row.id));
        }
    }

    fn apply(&mut self, action: ModerationAction) -> Result<()> {
        let Some(row) = self.selected_row() else {
            return Ok(());
        };

        let mut next = self.board.clone();
        let result = ModerationService::new(&mut next).apply(action, &self.viewer, row.id);
        match result {
            Ok(ActionOutcome::Applied) => match self.storage.save(&next) {
                Ok(()) => {
                    self.board = next;
                    self.state
                        .set_message(format!("{}: comment {}", action.label(), row.id));
                }
                Err(e) => {
                    tracing::warn!("Failed to save board: {}", e);
                    self.state.set_message(format!("Not saved: {}", e));
                }
            },
            Ok(ActionOutcome::Unchanged) => {
                self.state
                    .set_message(format!("Comment {} unchanged", row.id));
            }
            Err(e) => self.state.set_message(e.to_string()),
        }

        let remaining = self.view()?.rows.items.len();
        if self.state.selected >= remaining {
            self.state.selected = remaining.saturating_sub(1);
        }
        Ok(())
    }
}
