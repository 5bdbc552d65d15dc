//! src/view/components/photo_grid.rs
//! ============================================================================
//! # Photo grid: masonry tiles inside the scroll viewport
//!
//! Only tiles intersecting the viewport are drawn. A tile cut by the top or
//! bottom edge loses that border, so partially visible tiles read as
//! continuing off screen. Tiles are filled with the photo's dominant color.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    api::photo::Photo,
    model::{app_state::AppState, masonry::TilePlacement},
    util::humanize::compact_count,
    view::{components::loading_overlay::OptimizedLoadingOverlay, theme},
};

pub struct OptimizedPhotoGrid;

impl OptimizedPhotoGrid {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, app: &AppState, area: Rect) {
        frame.render_widget(Block::default().style(theme::base_style()), area);

        let Some(feed) = app.feed.as_ref().filter(|f| !f.is_empty()) else {
            OptimizedLoadingOverlay::new().render_feed_placeholder(frame, area);
            return;
        };

        let offset = app.ui.scroll_offset;
        let column_width = app.layout.column_width();

        for tile in app.layout.visible(offset, area.height) {
            let Some(photo) = feed.get(tile.index) else {
                continue;
            };
            if let Some(rect) = tile_rect(tile, column_width, offset, area) {
                let selected = tile.index == app.ui.cursor;
                self.render_tile(frame, photo, tile, offset, area.height, selected, rect);
            }
        }

        if app.query.is_loading() {
            OptimizedLoadingOverlay::new().render_more_indicator(frame, area);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_tile(
        &self,
        frame: &mut Frame<'_>,
        photo: &Photo,
        tile: &TilePlacement,
        offset: u32,
        viewport: u16,
        selected: bool,
        rect: Rect,
    ) {
        let swatch = photo.swatch().unwrap_or(theme::CURRENT_LINE);
        let text = theme::readable_on(swatch);

        let mut borders = Borders::LEFT | Borders::RIGHT;
        if tile.y >= offset {
            borders |= Borders::TOP;
        }
        if tile.bottom() <= offset + u32::from(viewport) {
            borders |= Borders::BOTTOM;
        }

        let border_style = if selected {
            theme::focused_border_style()
        } else {
            Style::default().fg(theme::BACKGROUND)
        };

        let block = Block::default()
            .borders(borders)
            .border_style(border_style)
            .style(Style::default().bg(swatch).fg(text));

        let mut lines = vec![
            Line::from(Span::styled(
                photo.user.name.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("♥ {}", compact_count(photo.likes))),
        ];
        if let Some(alt) = photo.alt_description.as_deref() {
            lines.push(Line::from(Span::styled(
                alt.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            rect,
        );
    }
}

impl Default for OptimizedPhotoGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen rectangle of the visible part of `tile`, if any.
fn tile_rect(tile: &TilePlacement, column_width: u16, offset: u32, area: Rect) -> Option<Rect> {
    let view_end = offset + u32::from(area.height);
    let top = tile.y.max(offset);
    let bottom = tile.bottom().min(view_end);
    if bottom <= top {
        return None;
    }

    let x = u32::from(area.x) + tile.column as u32 * u32::from(column_width);
    if x >= u32::from(area.right()) {
        return None;
    }
    let width = column_width.min(area.right() - x as u16);

    Some(Rect {
        x: x as u16,
        y: area.y + (top - offset) as u16,
        width,
        height: (bottom - top) as u16,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(column: usize, y: u32, height: u16) -> TilePlacement {
        TilePlacement {
            index: 0,
            column,
            y,
            height,
        }
    }

    #[test]
    fn fully_visible_tile_maps_to_screen() {
        let area = Rect::new(0, 3, 120, 36);
        let rect = tile_rect(&tile(2, 10, 15), 20, 0, area).unwrap();
        assert_eq!(rect, Rect::new(40, 13, 20, 15));
    }

    #[test]
    fn tiles_are_clipped_at_both_edges() {
        let area = Rect::new(0, 3, 120, 36);
        let top_cut = tile_rect(&tile(0, 0, 15), 20, 5, area).unwrap();
        assert_eq!((top_cut.y, top_cut.height), (3, 10));

        let bottom_cut = tile_rect(&tile(0, 30, 15), 20, 0, area).unwrap();
        assert_eq!((bottom_cut.y, bottom_cut.height), (33, 6));

        assert!(tile_rect(&tile(0, 40, 15), 20, 0, area).is_none());
    }
}
