//! src/view/components/loading_overlay.rs
//! ============================================================
//! Loading indicators for the grid: the placeholder shown while
//! the feed has no photos, and the small pagination marker shown
//! while a fetch cycle is in flight.

use crate::view::theme;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub struct OptimizedLoadingOverlay;

impl OptimizedLoadingOverlay {
    /// ctor
    pub fn new() -> Self {
        Self
    }

    /// Centered "Loading..." box for an empty or unset feed.
    pub fn render_feed_placeholder(&self, frame: &mut Frame<'_>, area: Rect) {
        let rect = centered(area, 24, 3);
        frame.render_widget(Clear, rect);

        let chrome = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::PURPLE))
            .style(theme::base_style());

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Loading...",
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            )))
            .block(chrome)
            .alignment(Alignment::Center),
            rect,
        );
    }

    /// One-line marker in the bottom-right corner of the grid.
    pub fn render_more_indicator(&self, frame: &mut Frame<'_>, area: Rect) {
        const LABEL: &str = " Loading more… ";
        let width = (LABEL.chars().count() as u16).min(area.width);
        if area.height == 0 || width == 0 {
            return;
        }

        let rect = Rect {
            x: area.right() - width,
            y: area.bottom() - 1,
            width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(LABEL).style(Style::default().bg(theme::PINK).fg(theme::CRUST)),
            rect,
        );
    }
}

impl Default for OptimizedLoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-size rectangle centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
