// splashify-core/src/model/app_state.rs
// AppState: everything the event loop owns, plus the transitions that touch
// more than one piece of it.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::{
    api::photo::Photo,
    config::Config,
    controller::scroll_trigger::SentinelObserver,
    error::AppError,
    model::{
        feed_state::{FeedBatch, FeedCollection},
        masonry::MasonryLayout,
        query_state::{ApplyMode, FetchRequest, QueryState},
        ui_state::{RedrawFlag, UIState},
    },
};

/// Rows above the grid: the bordered search header.
pub const HEADER_ROWS: u16 = 3;
/// Rows below the grid: the status bar.
pub const STATUS_ROWS: u16 = 1;

/// What happened to a completed fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Applied { added: usize },
    Failed,
    Stale,
}

#[derive(Debug)]
pub struct AppState {
    pub columns: usize,
    pub query: QueryState,
    /// `None` until the first cycle lands.
    pub feed: Option<FeedCollection>,
    pub layout: MasonryLayout,
    pub ui: UIState,
    pub sentinel: SentinelObserver,
    pub started_at: Instant,
    pub cycles_applied: u64,
    pub cycles_failed: u64,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        info!(columns = config.feed.columns, "Initializing AppState");
        Self {
            columns: usize::from(config.feed.columns.max(1)),
            query: QueryState::new(),
            feed: None,
            layout: MasonryLayout::default(),
            ui: UIState::new(),
            sentinel: SentinelObserver::new(),
            started_at: Instant::now(),
            cycles_applied: 0,
            cycles_failed: 0,
        }
    }

    pub fn photo_count(&self) -> usize {
        self.feed.as_ref().map_or(0, FeedCollection::len)
    }

    pub fn feed_is_empty(&self) -> bool {
        self.photo_count() == 0
    }

    /// Photo under the grid cursor.
    pub fn cursor_photo(&self) -> Option<Arc<Photo>> {
        self.feed.as_ref()?.get(self.ui.cursor).cloned()
    }

    /// Terminal resized: recompute the grid viewport and the layout.
    pub fn set_terminal_size(&mut self, width: u16, height: u16) {
        let grid_height = height.saturating_sub(HEADER_ROWS + STATUS_ROWS);
        self.ui.set_viewport(width, grid_height);
        self.relayout();
        self.ui.request_redraw(RedrawFlag::All);
    }

    pub fn column_width(&self) -> u16 {
        let columns = u16::try_from(self.columns).unwrap_or(u16::MAX).max(1);
        (self.ui.viewport_width / columns).max(1)
    }

    pub fn relayout(&mut self) {
        let photos = self.feed.as_ref().map_or(&[][..], FeedCollection::photos);
        self.layout = MasonryLayout::compute(photos, self.columns, self.column_width());

        let max = self.layout.max_offset(self.ui.viewport_height);
        if self.ui.scroll_offset > max {
            self.ui.scroll_offset = max;
        }
        if self.ui.cursor >= self.photo_count() {
            self.ui.cursor = self.photo_count().saturating_sub(1);
        }
    }

    /// Feed the current sentinel visibility to the observer. Returns the next
    /// page request when the trigger fires and is accepted.
    pub fn sentinel_check(&mut self) -> Option<FetchRequest> {
        if self.feed_is_empty() {
            return None;
        }
        let visible = self
            .layout
            .sentinel_visible(self.ui.scroll_offset, self.ui.viewport_height);

        if self.sentinel.report(visible) {
            self.query.sentinel_triggered()
        } else {
            None
        }
    }

    /// Fold a completed fetch cycle into the state.
    #[instrument(level = "debug", skip(self, result), fields(page = request.page, generation = request.generation))]
    pub fn apply_cycle(
        &mut self,
        request: &FetchRequest,
        result: Result<FeedBatch, AppError>,
    ) -> CycleOutcome {
        if !self.query.accepts(request) {
            debug!(
                current = self.query.generation(),
                "Discarding fetch cycle for a previous query"
            );
            return CycleOutcome::Stale;
        }

        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, query = request.query.term(), page = request.page, "Fetch cycle failed");
                self.ui.show_warning(format!("Could not load photos: {}", e.short()));
                self.cycles_failed += 1;
                // no automatic retry: only a fresh scroll to the bottom fires again
                let visible = self
                    .layout
                    .sentinel_visible(self.ui.scroll_offset, self.ui.viewport_height);
                self.sentinel.observe_from(visible);
                return CycleOutcome::Failed;
            }
        };

        let added = batch.photos.len();
        let total_pages = batch.total_pages;
        self.feed
            .get_or_insert_with(FeedCollection::default)
            .apply(batch, request.mode);
        self.query.record_applied(request, total_pages);
        self.cycles_applied += 1;

        if request.mode == ApplyMode::Replace {
            self.ui.reset_viewport();
        }
        self.relayout();
        self.sentinel.observe();
        self.ui.request_redraw(RedrawFlag::All);

        info!(
            added,
            len = self.photo_count(),
            page = request.page,
            total_pages,
            "Fetch cycle applied"
        );
        CycleOutcome::Applied { added }
    }
}
