//! src/view/components/status_bar.rs
//!
//! One line under the grid: mode, effective query, page and counts on the
//! left; the current notification (or the loading marker) on the right.

use crate::{
    model::{
        app_state::AppState,
        ui_state::{NotificationLevel, UIMode},
    },
    view::theme,
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

/// Optimized status bar renderer
pub struct OptimizedStatusBar;

impl OptimizedStatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, app: &AppState, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        Paragraph::new(left_text(app))
            .style(theme::base_style())
            .alignment(Alignment::Left)
            .render(layout[0], frame.buffer_mut());

        let (right, style) = match &app.ui.notification {
            Some(n) => (n.message.to_string(), notification_style(n.level)),
            None if app.query.is_loading() => {
                ("Loading… ".to_string(), Style::default().fg(theme::PINK))
            }
            None => ("? help ".to_string(), theme::muted_style()),
        };

        Paragraph::new(right)
            .style(style.bg(theme::BACKGROUND))
            .alignment(Alignment::Right)
            .render(layout[1], frame.buffer_mut());
    }
}

impl Default for OptimizedStatusBar {
    fn default() -> Self {
        Self::new()
    }
}

pub fn left_text(app: &AppState) -> String {
    let mode = match app.ui.mode {
        UIMode::Browse => "BROWSE",
        UIMode::Search => "SEARCH",
    };
    let query = app.query.effective_query();

    let pages = app
        .query
        .total_pages()
        .map_or_else(|| "?".to_string(), |p| p.to_string());

    format!(
        " {mode} | {} | page {}/{pages} | {} photos",
        query.term(),
        app.query.page(),
        app.photo_count()
    )
}

fn notification_style(level: NotificationLevel) -> Style {
    match level {
        NotificationLevel::Info => Style::default().fg(theme::CYAN),
        NotificationLevel::Success => Style::default().fg(theme::GREEN),
        NotificationLevel::Warning => Style::default().fg(theme::ORANGE),
        NotificationLevel::Error => Style::default().fg(theme::RED),
    }
}
