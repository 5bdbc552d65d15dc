//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the whole TUI from a borrowed
//! `AppState`. The event loop owns the state, so painting takes
//! no locks.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, trace};

use crate::{
    model::{
        app_state::{AppState, HEADER_ROWS, STATUS_ROWS},
        category::Category,
        ui_state::UIOverlay,
    },
    view::components::{
        category_overlay::OptimizedCategoryOverlay, detail_overlay::OptimizedDetailOverlay,
        header::OptimizedHeader, help_overlay::OptimizedHelpOverlay,
        photo_grid::OptimizedPhotoGrid, status_bar::OptimizedStatusBar,
    },
};

/// ---------------------------------------------------------------------------
/// Renderer struct (contains only caches + stats)
/// ---------------------------------------------------------------------------
#[derive(Default)]
pub struct UIRenderer {
    cache: LayoutCache,
    stats: RenderStats,
}

#[derive(Default)]
struct LayoutCache {
    screen: Rect,
    main: Option<[Rect; 3]>,
    hit: u64,
    miss: u64,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

/// ---------------------------------------------------------------------------
/// public API
/// ---------------------------------------------------------------------------
impl UIRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, frame: &mut Frame<'_>, app: &AppState) {
        let start = Instant::now();
        let [header, grid, status] = self.main_areas(frame.area());

        OptimizedHeader::new().render(frame, app, header);
        OptimizedPhotoGrid::new().render(frame, app, grid);
        OptimizedStatusBar::new().render(frame, app, status);
        self.draw_overlay(frame, app);

        let elapsed = start.elapsed();
        self.stats.total += elapsed;
        if elapsed.as_millis() > 16 {
            self.stats.slow += 1;
            trace!(elapsed_ms = elapsed.as_millis() as u64, "slow frame");
        }
        self.stats.frames += 1;
    }
}

/// ---------------------------------------------------------------------------
/// overlays
/// ---------------------------------------------------------------------------
impl UIRenderer {
    fn draw_overlay(&self, frame: &mut Frame<'_>, app: &AppState) {
        let screen = frame.area();

        match app.ui.overlay {
            UIOverlay::None => {}
            UIOverlay::Help => {
                OptimizedHelpOverlay::new().render_fast(frame, percent_rect(screen, 70, 85));
            }
            UIOverlay::Detail => {
                if let Some(photo) = app.ui.selection.as_deref() {
                    OptimizedDetailOverlay::new().render(frame, photo, percent_rect(screen, 80, 80));
                }
            }
            UIOverlay::Category => {
                OptimizedCategoryOverlay::new().render(
                    frame,
                    app.query.category(),
                    app.ui.category_cursor,
                    category_rect(screen),
                );
            }
        }
    }
}

/// ---------------------------------------------------------------------------
/// util: layout / rectangles
/// ---------------------------------------------------------------------------
impl UIRenderer {
    fn main_areas(&mut self, screen: Rect) -> [Rect; 3] {
        if self.cache.screen == screen {
            if let Some(areas) = self.cache.main {
                self.cache.hit += 1;
                return areas;
            }
        }

        self.cache.miss += 1;
        self.cache.screen = screen;
        let areas = Layout::vertical([
            Constraint::Length(HEADER_ROWS),
            Constraint::Fill(1),
            Constraint::Length(STATUS_ROWS),
        ])
        .areas(screen);
        self.cache.main = Some(areas);
        areas
    }
}

fn percent_rect(r: Rect, w_pct: u16, h_pct: u16) -> Rect {
    let w = (r.width * w_pct / 100).min(r.width);
    let h = (r.height * h_pct / 100).min(r.height);
    Rect {
        x: r.x + (r.width - w) / 2,
        y: r.y + (r.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Dropdown anchored under the header's right edge.
fn category_rect(screen: Rect) -> Rect {
    let width = 24.min(screen.width);
    let height = (Category::ALL.len() as u16 + 2).min(screen.height.saturating_sub(HEADER_ROWS));
    Rect {
        x: screen.right() - width,
        y: screen.y + HEADER_ROWS.min(screen.height),
        width,
        height,
    }
}

// ---------------------------------------------------------------------------
// tests (basic smoke only)
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::photo::fixtures, config::Config, model::feed_state::FeedBatch};
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded_app() -> AppState {
        let mut app = AppState::new(&Config::default());
        app.set_terminal_size(120, 40);
        let req = app.query.initial_request();
        let batch = FeedBatch {
            photos: fixtures::photos("p", 6),
            total: 60,
            total_pages: 4,
        };
        app.apply_cycle(&req, Ok(batch));
        app
    }

    #[test]
    fn cache_hit() {
        let mut r = UIRenderer::new();
        r.main_areas(Rect::new(0, 0, 100, 40));
        r.main_areas(Rect::new(0, 0, 100, 40));
        assert_eq!(r.cache.hit, 1);
        assert_eq!(r.cache.miss, 1);
    }

    #[test]
    fn empty_feed_shows_placeholder() {
        let mut app = AppState::new(&Config::default());
        app.set_terminal_size(80, 24);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut renderer = UIRenderer::new();

        terminal.draw(|f| renderer.render(f, &app)).unwrap();

        assert!(screen_text(&terminal).contains("Loading..."));
        assert_eq!(renderer.stats().frames, 1);
    }

    #[test]
    fn detail_overlay_lists_metadata() {
        let mut app = loaded_app();
        let photo = app.cursor_photo().unwrap();
        app.ui.open_detail(Arc::clone(&photo));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut renderer = UIRenderer::new();
        terminal.draw(|f| renderer.render(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("42 likes"));
        assert!(text.contains("June 3rd, 2024"));
        assert_eq!(app.feed.as_ref().map(|f| f.len()), Some(6));
    }
}
