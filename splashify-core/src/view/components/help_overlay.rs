//! Key reference overlay
use crate::{model::category::QUICK_TOPICS, view::theme};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct OptimizedHelpOverlay;

impl OptimizedHelpOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render_fast(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);

        let help_paragraph = Paragraph::new(Text::from(self.help_lines()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Splashify Help ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(theme::CYAN))
                    .style(Style::default().bg(theme::BACKGROUND)),
            )
            .style(Style::default().fg(theme::FOREGROUND))
            .wrap(Wrap { trim: false });

        frame.render_widget(help_paragraph, area);
    }

    fn section(title: &'static str) -> Line<'static> {
        Line::from(Span::styled(title, Style::default().fg(theme::CYAN)))
    }

    fn help_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Browsing",
                Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::section("Grid:"),
            Line::from("  ←↓↑→ / hjkl    Move between photos"),
            Line::from("  PgUp/PgDn      Scroll a screen (Space also pages down)"),
            Line::from("  Home / g       Back to the top"),
            Line::from("  Enter / click  Show photo details"),
            Line::from("  Mouse wheel    Scroll"),
            Line::from("  d              Download original (opens browser)"),
            Line::from("  click logo     Open the header photo"),
            Line::from(""),
            Self::section("Search:"),
            Line::from("  / or s         Type a search (Esc/Enter to leave)"),
            Line::from("  Ctrl+U         Clear while typing"),
            Line::from("  x / Backspace  Clear search"),
            Line::from("  c              Pick a category (no search active)"),
        ];

        for (i, topic) in QUICK_TOPICS.iter().enumerate() {
            lines.push(Line::from(format!("  {}              Search \"{topic}\"", i + 1)));
        }

        lines.extend([
            Line::from(""),
            Self::section("Application:"),
            Line::from("  ?              Toggle this help"),
            Line::from("  Esc            Close overlay / dismiss notice"),
            Line::from("  q / Ctrl+C     Quit"),
        ]);
        lines
    }
}

impl Default for OptimizedHelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
