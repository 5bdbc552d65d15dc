//! src/view/components/category_overlay.rs
//! Dropdown-style list of the fixed feed categories.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use crate::{model::category::Category, view::theme};

pub struct OptimizedCategoryOverlay;

impl OptimizedCategoryOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, current: Category, cursor: usize, area: Rect) {
        frame.render_widget(Clear, area);

        let items: Vec<ListItem<'_>> = Category::ALL
            .iter()
            .map(|c| {
                let marker = if *c == current { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme::GREEN)),
                    Span::raw(c.label()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Category ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(theme::border_style())
                    .style(theme::base_style()),
            )
            .highlight_style(
                Style::default()
                    .bg(theme::CURRENT_LINE)
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default().with_selected(Some(cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Default for OptimizedCategoryOverlay {
    fn default() -> Self {
        Self::new()
    }
}
