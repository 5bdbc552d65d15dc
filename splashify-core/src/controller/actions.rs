//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Centralized Application Commands
//!
//! Every key press, background result and debounce firing becomes one
//! `Action` before the dispatcher touches any state.

use compact_str::CompactString;

use crate::{
    controller::event_loop::TaskResult,
    model::{category::Category, masonry::Direction},
    util::debounce::Debounced,
};

#[derive(Debug)]
pub enum Action {
    /// Close whichever overlay is open.
    CloseOverlay,

    /// Close the detail overlay and clear the selection.
    CloseDetail,

    /// Empty the search bar and fall back to the default category.
    ClearSearch,

    /// Dismiss the status-bar notification.
    DismissNotification,

    /// Open the raw variant of the selected (or highlighted) photo.
    Download,

    /// Start typing into the search bar.
    FocusSearch,

    /// Leave the search bar; the typed text stays.
    BlurSearch,

    MoveCategoryCursor(isize),

    MoveCursor(Direction),

    NoOp,

    OpenCategoryPicker,

    /// Open the header logo photo in the browser.
    OpenLogo,

    /// Open the detail overlay for the highlighted tile.
    OpenDetail,

    /// Highlight a tile and open its detail overlay (mouse click).
    OpenTile(usize),

    /// Fill the search bar with a header shortcut.
    QuickTopic(&'static str),

    Quit,

    Resize(u16, u16),

    /// Scroll the grid by rows (negative is up).
    ScrollBy(i64),

    /// Scroll by whole viewports.
    ScrollPage(i64),

    ScrollTop,

    SearchBackspace,

    SearchInsert(char),

    SelectCategory(Category),

    /// A debounced search value became due.
    SettleSearch(Debounced<CompactString>),

    TaskResult(TaskResult),

    /// Periodic housekeeping (notification expiry).
    Tick,

    ToggleHelp,
}
