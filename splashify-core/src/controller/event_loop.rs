//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop: terminal events, task results and debounce firings
//!
//! `next_action` waits on every event source at once and turns whatever
//! arrives first into an [`Action`]. Key mapping depends on the input mode
//! and the open overlay, and is a pure function of the state so it can be
//! tested without a terminal.

use std::time::Duration;

use compact_str::CompactString;
use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use tokio::{
    sync::mpsc,
    time::{Interval, MissedTickBehavior, interval},
};
use tracing::{debug, info, trace};

use crate::{
    api::{client::TopicTitles, photo::LogoPhoto},
    controller::actions::Action,
    error::AppError,
    model::{
        app_state::{AppState, HEADER_ROWS},
        category::{Category, quick_topic},
        feed_state::FeedBatch,
        masonry::Direction,
        query_state::FetchRequest,
        ui_state::{UIMode, UIOverlay},
    },
    util::debounce::Debounced,
    view::components::header::BRAND_WIDTH,
};

const TICK: Duration = Duration::from_millis(250);
const WHEEL_ROWS: i64 = 3;

/// Messages from background tasks.
#[derive(Debug)]
pub enum TaskResult {
    /// A fetch cycle settled.
    FetchCycle {
        request: FetchRequest,
        result: Result<FeedBatch, AppError>,
        elapsed: Duration,
    },

    /// Header logo photo.
    Logo(Result<LogoPhoto, AppError>),

    /// Header trending topics.
    Topics(Result<TopicTitles, AppError>),
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    debounce_rx: mpsc::UnboundedReceiver<Debounced<CompactString>>,
    event_stream: EventStream,
    tick: Interval,
    events_seen: u64,
}

impl EventLoop {
    pub fn new(
        task_rx: mpsc::UnboundedReceiver<TaskResult>,
        debounce_rx: mpsc::UnboundedReceiver<Debounced<CompactString>>,
    ) -> Self {
        info!("Initializing event loop");
        let mut tick = interval(TICK);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            task_rx,
            debounce_rx,
            event_stream: EventStream::new(),
            tick,
            events_seen: 0,
        }
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    /// Wait for the next thing to do. `None` once every source is closed.
    pub async fn next_action(&mut self, app: &AppState) -> Option<Action> {
        let action = tokio::select! {
            Some(Ok(event)) = self.event_stream.next() => {
                trace!("Terminal event received: {:?}", event);
                Some(map_event(app, event))
            }

            Some(task_result) = self.task_rx.recv() => {
                debug!("Task result received");
                Some(Action::TaskResult(task_result))
            }

            Some(fired) = self.debounce_rx.recv() => {
                debug!(seq = fired.seq, "Debounced search due");
                Some(Action::SettleSearch(fired))
            }

            _ = self.tick.tick() => Some(Action::Tick),

            else => {
                info!("Event loop terminated - no more events");
                None
            }
        };

        self.events_seen += 1;
        action
    }
}

pub fn map_event(app: &AppState, event: TermEvent) -> Action {
    match event {
        TermEvent::Key(key) if key.kind != KeyEventKind::Release => map_key(app, key),
        TermEvent::Mouse(mouse) => map_mouse(app, mouse),
        TermEvent::Resize(w, h) => {
            info!("Terminal resize: {}x{}", w, h);
            Action::Resize(w, h)
        }
        _ => Action::NoOp,
    }
}

fn map_mouse(app: &AppState, mouse: MouseEvent) -> Action {
    let click = mouse.kind == MouseEventKind::Down(MouseButton::Left);
    match app.ui.overlay {
        UIOverlay::None => {}
        UIOverlay::Detail if click => return Action::CloseDetail,
        _ => return Action::NoOp,
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => Action::ScrollBy(WHEEL_ROWS),
        MouseEventKind::ScrollUp => Action::ScrollBy(-WHEEL_ROWS),
        _ if click && on_brand(mouse.column, mouse.row) => Action::OpenLogo,
        _ if click => tile_at(app, mouse.column, mouse.row).map_or(Action::NoOp, Action::OpenTile),
        _ => Action::NoOp,
    }
}

/// The brand mark sits on the header's text row, inside its border.
fn on_brand(column: u16, row: u16) -> bool {
    row == 1 && (1..=BRAND_WIDTH).contains(&column)
}

/// Tile under a screen cell, if the cell is inside the grid.
fn tile_at(app: &AppState, column: u16, row: u16) -> Option<usize> {
    let grid_row = row.checked_sub(HEADER_ROWS)?;
    if grid_row >= app.ui.viewport_height {
        return None;
    }
    app.layout
        .hit(column, app.ui.scroll_offset + u32::from(grid_row))
}

/// Key → action for the current mode and overlay.
pub fn map_key(app: &AppState, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.ui.overlay {
        UIOverlay::Detail => return detail_keys(key),
        UIOverlay::Category => return category_keys(app, key),
        UIOverlay::Help => return help_keys(key),
        UIOverlay::None => {}
    }

    match app.ui.mode {
        UIMode::Search => search_keys(key),
        UIMode::Browse => browse_keys(app, key),
    }
}

fn browse_keys(app: &AppState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc if app.ui.notification.is_some() => Action::DismissNotification,
        KeyCode::Esc => Action::NoOp,

        KeyCode::Up | KeyCode::Char('k') => Action::MoveCursor(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveCursor(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Action::MoveCursor(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Action::MoveCursor(Direction::Right),
        KeyCode::PageDown | KeyCode::Char(' ') => Action::ScrollPage(1),
        KeyCode::PageUp => Action::ScrollPage(-1),
        KeyCode::Home | KeyCode::Char('g') => Action::ScrollTop,

        KeyCode::Enter => Action::OpenDetail,
        KeyCode::Char('d') => Action::Download,

        KeyCode::Char('/') | KeyCode::Char('s') => Action::FocusSearch,
        KeyCode::Char('x') | KeyCode::Backspace => Action::ClearSearch,
        KeyCode::Char('c') => Action::OpenCategoryPicker,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char(ch) => quick_topic(ch).map_or(Action::NoOp, Action::QuickTopic),

        _ => Action::NoOp,
    }
}

fn search_keys(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => Action::BlurSearch,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::ClearSearch,
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::SearchInsert(ch)
        }
        _ => Action::NoOp,
    }
}

fn detail_keys(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Action::CloseDetail,
        KeyCode::Char('d') => Action::Download,
        _ => Action::NoOp,
    }
}

fn category_keys(app: &AppState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Action::CloseOverlay,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveCategoryCursor(-1),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveCategoryCursor(1),
        KeyCode::Enter => Action::SelectCategory(Category::from_index(app.ui.category_cursor)),
        _ => Action::NoOp,
    }
}

fn help_keys(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Action::CloseOverlay,
        _ => Action::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> AppState {
        AppState::new(&Config::default())
    }

    #[test]
    fn browse_mode_navigation() {
        let app = app();
        assert!(matches!(map_key(&app, press(KeyCode::Char('j'))), Action::MoveCursor(Direction::Down)));
        assert!(matches!(map_key(&app, press(KeyCode::Enter)), Action::OpenDetail));
        assert!(matches!(map_key(&app, press(KeyCode::Char('/'))), Action::FocusSearch));
        assert!(matches!(map_key(&app, press(KeyCode::Char('3'))), Action::QuickTopic("Travel")));
        assert!(matches!(map_key(&app, press(KeyCode::Char('q'))), Action::Quit));
    }

    #[test]
    fn search_mode_types_letters() {
        let mut app = app();
        app.ui.mode = UIMode::Search;
        assert!(matches!(map_key(&app, press(KeyCode::Char('q'))), Action::SearchInsert('q')));
        assert!(matches!(map_key(&app, press(KeyCode::Char('1'))), Action::SearchInsert('1')));
        assert!(matches!(map_key(&app, press(KeyCode::Esc)), Action::BlurSearch));
        assert!(matches!(
            map_key(&app, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Action::ClearSearch
        ));
    }

    #[test]
    fn detail_overlay_captures_keys() {
        let mut app = app();
        app.ui.overlay = UIOverlay::Detail;
        assert!(matches!(map_key(&app, press(KeyCode::Char('j'))), Action::NoOp));
        assert!(matches!(map_key(&app, press(KeyCode::Esc)), Action::CloseDetail));
        assert!(matches!(map_key(&app, press(KeyCode::Char('d'))), Action::Download));
    }

    #[test]
    fn wheel_is_ignored_under_overlays() {
        let mut app = app();
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches!(map_mouse(&app, wheel), Action::ScrollBy(3)));
        app.ui.overlay = UIOverlay::Detail;
        assert!(matches!(map_mouse(&app, wheel), Action::NoOp));
    }

    #[test]
    fn click_opens_tile_under_pointer() {
        use crate::{api::photo::fixtures, model::feed_state::FeedBatch};

        let mut app = app();
        app.set_terminal_size(120, 40);
        let req = app.query.initial_request();
        app.apply_cycle(
            &req,
            Ok(FeedBatch {
                photos: fixtures::photos("p", 12),
                total: 12,
                total_pages: 1,
            }),
        );
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        // portrait tiles in 20-cell columns are 15 rows tall
        assert!(matches!(map_mouse(&app, click(25, HEADER_ROWS)), Action::OpenTile(1)));
        assert!(matches!(map_mouse(&app, click(5, HEADER_ROWS + 16)), Action::OpenTile(6)));
        assert!(matches!(map_mouse(&app, click(5, 0)), Action::NoOp));
        assert!(matches!(map_mouse(&app, click(3, 1)), Action::OpenLogo));
        assert!(matches!(map_mouse(&app, click(BRAND_WIDTH + 4, 1)), Action::NoOp));

        app.ui.overlay = UIOverlay::Detail;
        assert!(matches!(map_mouse(&app, click(25, HEADER_ROWS)), Action::CloseDetail));
    }

    #[test]
    fn category_overlay_selects_highlighted() {
        let mut app = app();
        app.ui.overlay = UIOverlay::Category;
        app.ui.category_cursor = 1;
        assert!(matches!(
            map_key(&app, press(KeyCode::Enter)),
            Action::SelectCategory(Category::New)
        ));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        app.ui.overlay = UIOverlay::Help;
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(map_key(&app, key), Action::Quit));
    }
}
