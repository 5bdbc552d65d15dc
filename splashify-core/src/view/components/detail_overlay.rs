//! src/view/components/detail_overlay.rs
//! Modal view of the selected photo: swatch preview plus metadata.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    api::photo::Photo,
    util::humanize::{format_upload_date, format_upload_date_str},
    view::theme,
};

pub struct OptimizedDetailOverlay;

impl OptimizedDetailOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, photo: &Photo, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", photo.id))
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(" d download original · Esc close ").centered())
            .borders(Borders::ALL)
            .border_style(theme::focused_border_style())
            .style(theme::base_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [preview, meta] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(inner);

        self.render_preview(frame, photo, preview);
        frame.render_widget(
            Paragraph::new(detail_lines(photo))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::LEFT).border_style(theme::muted_style())),
            meta,
        );
    }

    fn render_preview(&self, frame: &mut Frame<'_>, photo: &Photo, area: Rect) {
        if area.is_empty() {
            return;
        }
        let swatch = photo.swatch().unwrap_or(theme::CURRENT_LINE);

        // keep the photo's proportions inside the preview pane
        let rows = (f32::from(area.width) * photo.aspect_ratio() / 2.0).round() as u16;
        let height = rows.clamp(1, area.height);
        let rect = Rect {
            x: area.x,
            y: area.y + (area.height - height) / 2,
            width: area.width,
            height,
        };

        frame.render_widget(
            Paragraph::new(format!("{}×{}", photo.width, photo.height))
                .alignment(Alignment::Center)
                .style(Style::default().bg(swatch).fg(theme::readable_on(swatch))),
            rect,
        );
    }
}

impl Default for OptimizedDetailOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata lines shown next to the preview.
pub fn detail_lines(photo: &Photo) -> Vec<Line<'static>> {
    let uploaded = photo
        .uploaded_at()
        .map(|at| format_upload_date(&at))
        .unwrap_or_else(|| format_upload_date_str(&photo.created_at));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(photo.user.name.to_string(), theme::heading_style()),
            Span::styled(format!("  @{}", photo.user.username), theme::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("♥ ", theme::like_style()),
            Span::raw(format!("{} likes", photo.likes)),
        ]),
        Line::from(vec![
            Span::styled("Uploaded ", theme::muted_style()),
            Span::raw(uploaded),
        ]),
        Line::from(""),
    ];

    if let Some(description) = photo.description.as_deref() {
        lines.push(Line::from(description.to_string()));
    }
    if let Some(alt) = photo.alt_description.as_deref() {
        lines.push(Line::from(Span::styled(
            alt.to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Image ", theme::muted_style()),
        Span::styled(
            photo.urls.display().to_string(),
            Style::default().fg(theme::CYAN),
        ),
    ]));
    lines
}
