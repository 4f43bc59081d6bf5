//! Terminal application around the queue browser

mod state;

pub use state::{AppMode, AppState, Browser};

use anyhow::Result;
use cmod_core::account::Viewer;
use cmod_core::board::{Board, BoardStorage};
use cmod_core::comment::ModerationStatus;
use cmod_core::config::Config;
use cmod_core::queue::{QueueRow, QueueView};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};
use std::time::Duration;

use crate::theme::Theme;

/// Main application
pub struct App {
    browser: Browser,
    theme: Theme,
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new app for a moderator
    pub fn new(
        board: Board,
        storage: Box<dyn BoardStorage>,
        viewer: Viewer,
        config: &Config,
    ) -> Result<Self> {
        let browser = Browser::new(board, storage, viewer, config)?;

        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            browser,
            theme: Theme::from_name(&config.ui.theme),
            terminal,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            if event::poll(Duration::from_millis(100))? {
                if let event::Event::Key(key) = event::read()? {
                    self.browser.handle_key(key)?;
                }
            }

            if self.browser.state.should_quit {
                break;
            }
        }

        tracing::debug!("Queue browser closed");
        Ok(())
    }

    /// Board as left by the session
    pub fn board(&self) -> &Board {
        self.browser.board()
    }

    fn draw(&mut self) -> Result<()> {
        let view = self.browser.view()?;
        let state = self.browser.state.clone();
        let theme = &self.theme;

        self.terminal.draw(|frame| {
            let area = frame.area();
            render_queue(frame, area, &view, &state, theme);

            match state.mode {
                AppMode::Help => render_help(frame, area, theme),
                AppMode::Confirm(action) => {
                    if let Some(row) = view.rows.items.get(state.selected) {
                        render_confirm(frame, area, action.label(), row, theme);
                    }
                }
                AppMode::Normal => {}
            }
        })?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn render_queue(frame: &mut Frame, area: Rect, view: &QueueView, state: &AppState, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_bar(frame, chunks[0], view, theme);
    render_rows(frame, chunks[1], view, state, theme);
    render_status_bar(frame, chunks[2], view, state, theme);
}

fn render_title_bar(frame: &mut Frame, area: Rect, view: &QueueView, theme: &Theme) {
    let mut spans = vec![Span::styled(
        format!(" {} ({}) ", view.title, view.rows.total_items),
        Style::default()
            .fg(theme.focus_border)
            .add_modifier(Modifier::BOLD),
    )];
    for link in &view.nav {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} ({})", link.label, link.count),
            Style::default().fg(theme.unfocus_border),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_rows(frame: &mut Frame, area: Rect, view: &QueueView, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title(format!(" Page {} of {} ", view.rows.page, view.rows.total_pages().max(1)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.focus_border));

    if view.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nothing to review here",
                Style::default().fg(theme.faded),
            ))
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = view
        .rows
        .items
        .iter()
        .map(|row| ListItem::new(row_lines(row, theme)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selection));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn row_lines<'a>(row: &'a QueueRow, theme: &Theme) -> Vec<Line<'a>> {
    let status_color = match row.status {
        ModerationStatus::Reviewed => theme.reviewed,
        ModerationStatus::Hidden => theme.faded,
        _ => theme.pending,
    };

    let mut header = vec![
        Span::styled(format!("#{:<5}", row.id.0), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("{:<15}", row.status.label()), Style::default().fg(status_color)),
        Span::styled(
            format!("⚑ {:<3}", row.flags_count),
            Style::default().fg(theme.flags),
        ),
        Span::raw(format!("{} on {}", row.author, row.commentable)),
    ];
    if row.author_banned {
        header.push(Span::styled(" [banned]", Style::default().fg(theme.flags)));
    }

    let body_style = if row.body.faded {
        Style::default()
            .fg(theme.faded)
            .add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
    };
    let body = row.body.text.lines().next().unwrap_or_default();

    vec![
        Line::from(header),
        Line::from(Span::styled(format!("       {}", body), body_style)),
    ]
}

fn render_status_bar(frame: &mut Frame, area: Rect, view: &QueueView, state: &AppState, theme: &Theme) {
    let mode = match state.mode {
        AppMode::Normal => "NORMAL",
        AppMode::Help => "HELP",
        AppMode::Confirm(_) => "CONFIRM",
    };

    let text = state.message.clone().unwrap_or_else(|| {
        format!(
            " {} | {} | page {} | by {} | ? for help ",
            mode,
            view.state.filter.label(),
            view.state.page,
            view.state.order.label()
        )
    });

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bg).fg(Color::White)),
        area,
    );
}

fn render_confirm(frame: &mut Frame, area: Rect, label: &str, row: &QueueRow, theme: &Theme) {
    let text = vec![
        Line::from(Span::styled(
            format!("{} comment #{} by {}?", label, row.id, row.author),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y to confirm, any other key to cancel",
            Style::default().fg(theme.faded),
        )),
    ];

    let popup = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.flags)),
        ),
        popup,
    );
}

fn render_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let heading = Style::default().fg(theme.pending);
    let text = vec![
        Line::from(Span::styled("cmod - Moderation queue", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Navigation", heading)),
        Line::from("  j/k         Move selection up/down"),
        Line::from("  n/p         Next/Previous page"),
        Line::from("  f, Tab      Next filter"),
        Line::from("  o           Toggle order (newest / most flagged)"),
        Line::from(""),
        Line::from(Span::styled("Actions", heading)),
        Line::from("  h           Hide comment"),
        Line::from("  r           Mark as reviewed"),
        Line::from("  b           Ban author"),
        Line::from(""),
        Line::from(Span::styled("Other", heading)),
        Line::from("  q           Quit"),
        Line::from("  ?           Show this help"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(theme.faded))),
    ];

    let help_area = centered_rect(50, 70, area);
    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focus_border)),
        ),
        help_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup[1])[1]
}
