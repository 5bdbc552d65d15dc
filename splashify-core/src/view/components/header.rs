//! src/view/components/header.rs
//! Title, search bar, active category and trending topics.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    api::photo::parse_hex_color,
    model::{app_state::AppState, ui_state::UIMode},
    view::theme,
};

/// Columns taken by the brand mark, left of the search bar.
pub const BRAND_WIDTH: u16 = 13;

pub struct OptimizedHeader;

impl OptimizedHeader {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, app: &AppState, area: Rect) {
        let editing = app.ui.mode == UIMode::Search;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if editing {
                theme::focused_border_style()
            } else {
                theme::border_style()
            })
            .style(theme::base_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [brand, search, filter, topics] = Layout::horizontal([
            Constraint::Length(BRAND_WIDTH),
            Constraint::Min(20),
            Constraint::Length(22),
            Constraint::Percentage(35),
        ])
        .areas(inner);

        frame.render_widget(Paragraph::new(self.brand_line(app)), brand);
        frame.render_widget(Paragraph::new(self.search_line(app, editing)), search);
        frame.render_widget(Paragraph::new(self.filter_line(app)), filter);
        frame.render_widget(
            Paragraph::new(self.topics_line(app)).alignment(Alignment::Right),
            topics,
        );
    }

    fn brand_line(&self, app: &AppState) -> Line<'static> {
        let logo = app
            .ui
            .header
            .logo
            .as_ref()
            .and_then(|l| l.color.as_deref())
            .and_then(parse_hex_color)
            .unwrap_or(theme::PURPLE);

        Line::from(vec![
            Span::styled("■ ", Style::default().fg(logo)),
            Span::styled("Splashify", theme::heading_style()),
        ])
    }

    fn search_line(&self, app: &AppState, editing: bool) -> Line<'static> {
        let input = app.ui.input.to_string();
        let mut spans = vec![Span::styled("/ ", theme::muted_style())];

        if input.is_empty() && !editing {
            spans.push(Span::styled("Search photos", theme::muted_style()));
        } else {
            spans.push(Span::styled(input, Style::default().fg(theme::FOREGROUND)));
        }
        if editing {
            spans.push(Span::styled("▏", Style::default().fg(theme::YELLOW)));
        }
        Line::from(spans)
    }

    fn filter_line(&self, app: &AppState) -> Line<'static> {
        if app.query.search_active() {
            Line::from(vec![
                Span::styled("Category ", theme::muted_style()),
                Span::styled("(search)", theme::muted_style()),
            ])
        } else {
            Line::from(vec![
                Span::styled("Category ", theme::muted_style()),
                Span::styled(
                    app.query.category().label(),
                    Style::default().fg(theme::CYAN),
                ),
            ])
        }
    }

    fn topics_line(&self, app: &AppState) -> Line<'static> {
        let topics = &app.ui.header.topics;
        if topics.is_empty() {
            return Line::from(Span::styled("1-6 quick topics", theme::muted_style()));
        }

        let mut spans = vec![Span::styled("Trending: ", theme::muted_style())];
        for (i, topic) in topics.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" · ", theme::muted_style()));
            }
            spans.push(Span::styled(topic.to_string(), Style::default().fg(theme::GREEN)));
        }
        Line::from(spans)
    }
}

impl Default for OptimizedHeader {
    fn default() -> Self {
        Self::new()
    }
}
