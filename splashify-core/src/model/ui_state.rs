//! src/model/ui_state.rs
//! UI state: input mode, overlays, cursor, scroll position and selection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use compact_str::CompactString;

use crate::api::{client::TopicTitles, photo::LogoPhoto, photo::Photo};

/// Atomic redraw flags for lock-free UI updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Main = 1,
    StatusBar = 2,
    Overlay = 4,
    Notification = 8,
    All = 15,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Where keystrokes go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIMode {
    #[default]
    Browse = 0,
    /// Typing into the search bar.
    Search = 1,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum UIOverlay {
    #[default]
    None = 0,
    Help = 1,
    Detail = 2,
    Category = 3,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

/// Compact notification with timestamp
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss_ms: Option<u32>,
}

/// Decorative header content fetched once at startup.
#[derive(Debug, Clone, Default)]
pub struct HeaderState {
    pub logo: Option<LogoPhoto>,
    pub topics: TopicTitles,
}

#[derive(Debug)]
pub struct UIState {
    pub redraw_flags: AtomicU32,

    pub mode: UIMode,
    pub overlay: UIOverlay,

    /// Feed index under the cursor.
    pub cursor: usize,
    /// Highlighted row of the category overlay.
    pub category_cursor: usize,

    /// Grid scroll position, in rows.
    pub scroll_offset: u32,
    /// Grid viewport size as of the last draw.
    pub viewport_height: u16,
    pub viewport_width: u16,
    /// Set while the detail overlay is open.
    pub scroll_locked: bool,

    /// Photo shown in the detail overlay. Shares the feed's allocation.
    pub selection: Option<Arc<Photo>>,

    pub input: CompactString,
    pub input_cursor: usize,

    pub notification: Option<Notification>,
    pub header: HeaderState,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}

impl UIState {
    pub fn new() -> Self {
        Self {
            redraw_flags: AtomicU32::new(RedrawFlag::All.bits() as u32),
            mode: UIMode::Browse,
            overlay: UIOverlay::None,
            cursor: 0,
            category_cursor: 0,
            scroll_offset: 0,
            viewport_height: 0,
            viewport_width: 0,
            scroll_locked: false,
            selection: None,
            input: CompactString::new(""),
            input_cursor: 0,
            notification: None,
            header: HeaderState::default(),
        }
    }

    // Atomic redraw operations
    #[inline]
    pub fn request_redraw(&self, flag: RedrawFlag) {
        self.redraw_flags
            .fetch_or(flag.bits() as u32, Ordering::Relaxed);
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw_flags.load(Ordering::Relaxed) != 0
    }

    #[inline]
    pub fn clear_redraw(&self) {
        self.redraw_flags.store(0, Ordering::Relaxed);
    }

    // Selection and detail overlay move together
    pub fn open_detail(&mut self, photo: Arc<Photo>) {
        self.selection = Some(photo);
        self.overlay = UIOverlay::Detail;
        self.scroll_locked = true;
        self.request_redraw(RedrawFlag::All);
    }

    pub fn close_detail(&mut self) {
        self.selection = None;
        if self.overlay == UIOverlay::Detail {
            self.overlay = UIOverlay::None;
        }
        self.scroll_locked = false;
        self.request_redraw(RedrawFlag::All);
    }

    pub fn detail_open(&self) -> bool {
        self.overlay == UIOverlay::Detail && self.selection.is_some()
    }

    /// Move the grid by `delta` rows within `0..=max_offset`. Returns false
    /// when scrolling is locked or nothing moved.
    pub fn scroll_by(&mut self, delta: i64, max_offset: u32) -> bool {
        if self.scroll_locked {
            return false;
        }
        let next = (i64::from(self.scroll_offset) + delta).clamp(0, i64::from(max_offset)) as u32;
        self.set_scroll(next)
    }

    pub fn set_scroll(&mut self, offset: u32) -> bool {
        if self.scroll_locked || offset == self.scroll_offset {
            return false;
        }
        self.scroll_offset = offset;
        self.request_redraw(RedrawFlag::Main);
        true
    }

    /// Jump back to the first tile, e.g. after the feed was replaced.
    pub fn reset_viewport(&mut self) {
        self.cursor = 0;
        self.scroll_offset = 0;
        self.request_redraw(RedrawFlag::Main);
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    // Notification system with inline helpers
    pub fn show_notification(
        &mut self,
        message: impl Into<CompactString>,
        level: NotificationLevel,
        auto_dismiss_ms: Option<u32>,
    ) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss_ms,
        });
        self.request_redraw(RedrawFlag::Notification);
    }

    #[inline]
    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Info, Some(3000));
    }

    #[inline]
    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Success, Some(2000));
    }

    #[inline]
    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Warning, Some(5000));
    }

    #[inline]
    pub fn show_error(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Error, Some(8000));
    }

    // Auto-dismiss notifications
    pub fn update_notification(&mut self) -> bool {
        if let Some(notification) = &self.notification
            && let Some(auto_dismiss_ms) = notification.auto_dismiss_ms
            && notification.timestamp.elapsed().as_millis() > auto_dismiss_ms as u128
        {
            self.notification = None;
            self.request_redraw(RedrawFlag::Notification);
            return true;
        }
        false
    }

    // Search bar editing
    pub fn clear_input(&mut self) {
        self.input = CompactString::new("");
        self.input_cursor = 0;
    }

    pub fn set_input(&mut self, text: impl Into<CompactString>) {
        self.input = text.into();
        self.input_cursor = self.input.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut input_str = self.input.to_string();
        input_str.insert(self.input_cursor, ch);
        self.input = input_str.into();
        self.input_cursor += ch.len_utf8();
    }

    pub fn delete_char_before(&mut self) -> bool {
        let Some((char_pos, _)) = self
            .input
            .char_indices()
            .rev()
            .find(|(pos, _)| *pos < self.input_cursor)
        else {
            return false;
        };

        let mut input_str = self.input.to_string();
        input_str.remove(char_pos);
        self.input = input_str.into();
        self.input_cursor = char_pos;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::photo::fixtures;

    #[test]
    fn detail_open_and_close_move_together() {
        let mut ui = UIState::new();
        let photo = Arc::new(fixtures::photo("a"));

        ui.open_detail(Arc::clone(&photo));
        assert!(ui.detail_open());
        assert!(ui.scroll_locked);
        assert!(Arc::ptr_eq(ui.selection.as_ref().unwrap(), &photo));

        ui.close_detail();
        assert!(ui.selection.is_none());
        assert_eq!(ui.overlay, UIOverlay::None);
        assert!(!ui.scroll_locked);
    }

    #[test]
    fn scrolling_is_suppressed_while_locked() {
        let mut ui = UIState::new();
        assert!(ui.scroll_by(5, 100));
        assert_eq!(ui.scroll_offset, 5);

        ui.open_detail(Arc::new(fixtures::photo("a")));
        assert!(!ui.scroll_by(5, 100));
        assert!(!ui.set_scroll(0));
        assert_eq!(ui.scroll_offset, 5);

        ui.close_detail();
        assert!(ui.scroll_by(-50, 100));
        assert_eq!(ui.scroll_offset, 0);
    }

    #[test]
    fn scroll_clamps_to_content() {
        let mut ui = UIState::new();
        ui.scroll_by(500, 40);
        assert_eq!(ui.scroll_offset, 40);
        assert!(!ui.scroll_by(1, 40));
    }

    #[test]
    fn input_editing_handles_multibyte() {
        let mut ui = UIState::new();
        for ch in "café".chars() {
            ui.insert_char(ch);
        }
        assert!(ui.delete_char_before());
        assert_eq!(ui.input, "caf");
        ui.clear_input();
        assert!(!ui.delete_char_before());
    }

    #[test]
    fn test_atomic_operations() {
        let ui_state = UIState::new();

        ui_state.request_redraw(RedrawFlag::Main);
        assert!(ui_state.needs_redraw());

        ui_state.clear_redraw();
        assert!(!ui_state.needs_redraw());
    }
}
