//! src/controller/action_dispatcher.rs
//! ============================================================================
//! # ActionDispatcher: applies actions to `AppState`, launches background work
//!
//! The dispatcher is the only place that starts fetch cycles. Every launch
//! acquires the loading guard first, and every layout or scroll change is
//! followed by a sentinel check so infinite scroll reacts to keys, wheel and
//! resizes alike.

use std::sync::Arc;

use compact_str::CompactString;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    api::client::PhotoApi,
    config::Config,
    controller::{
        actions::Action,
        event_loop::TaskResult,
        feed_controller::FetchParams,
    },
    model::{
        app_state::{AppState, CycleOutcome},
        category::Category,
        query_state::{FetchRequest, InputOutcome},
        ui_state::{RedrawFlag, UIMode, UIOverlay},
    },
    tasks::{fetch_task::spawn_fetch_cycle, startup_task::spawn_header_fetch},
    util::debounce::{DebounceConfig, Debounced, Debouncer},
};

/// Hands a URL to the system's default handler.
pub type UrlOpener = Box<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

/// Running totals, logged at shutdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatcherStats {
    pub actions: u64,
    pub cycles_launched: u64,
    pub downloads: u64,
}

pub struct ActionDispatcher {
    api: Arc<dyn PhotoApi>,
    params: FetchParams,
    task_tx: mpsc::UnboundedSender<TaskResult>,
    debouncer: Debouncer<CompactString>,
    opener: UrlOpener,
    stats: DispatcherStats,
}

impl ActionDispatcher {
    /// Returns the dispatcher and the receiver for debounced search values.
    pub fn new(
        api: Arc<dyn PhotoApi>,
        config: &Config,
        task_tx: mpsc::UnboundedSender<TaskResult>,
    ) -> (Self, mpsc::UnboundedReceiver<Debounced<CompactString>>) {
        let (debouncer, debounce_rx) =
            Debouncer::new(DebounceConfig::with_delay(config.feed.search_debounce));

        let dispatcher = Self {
            api,
            params: FetchParams::from(&config.api),
            task_tx,
            debouncer,
            opener: Box::new(|url: &str| open::that_detached(url)),
            stats: DispatcherStats::default(),
        };
        (dispatcher, debounce_rx)
    }

    /// Replace the URL handler used by downloads.
    #[must_use]
    pub fn with_opener(mut self, opener: UrlOpener) -> Self {
        self.opener = opener;
        self
    }

    pub fn stats(&self) -> DispatcherStats {
        self.stats
    }

    /// Startup: header content, then the first page of the default feed.
    pub fn start(&mut self, app: &mut AppState) {
        spawn_header_fetch(Arc::clone(&self.api), self.task_tx.clone());
        app.sentinel.observe();
        let request = app.query.initial_request();
        self.launch(app, request);
    }

    /// Release the debouncer and the sentinel subscription.
    pub fn shutdown(&mut self, app: &mut AppState) {
        self.debouncer.shutdown();
        app.sentinel.disconnect();
        info!(
            actions = self.stats.actions,
            cycles = self.stats.cycles_launched,
            downloads = self.stats.downloads,
            "Dispatcher shut down"
        );
    }

    /// Apply one action. Returns `false` when the application should exit.
    pub fn handle(&mut self, app: &mut AppState, action: Action) -> bool {
        self.stats.actions += 1;

        match action {
            Action::Quit => {
                info!("Quit requested");
                return false;
            }

            Action::NoOp => {}

            Action::Tick => {
                app.ui.update_notification();
            }

            Action::Resize(w, h) => {
                app.set_terminal_size(w, h);
                self.check_sentinel(app);
            }

            // grid movement
            Action::MoveCursor(direction) => {
                if let Some(next) = app.layout.neighbor(app.ui.cursor, direction) {
                    app.ui.cursor = next;
                    let offset = app
                        .layout
                        .reveal(next, app.ui.scroll_offset, app.ui.viewport_height);
                    app.ui.set_scroll(offset);
                    app.ui.request_redraw(RedrawFlag::Main);
                    self.check_sentinel(app);
                }
            }

            Action::ScrollBy(rows) => self.scroll(app, rows),

            Action::ScrollPage(pages) => {
                let rows = i64::from(app.ui.viewport_height.max(1)) * pages;
                self.scroll(app, rows);
            }

            Action::ScrollTop => {
                app.ui.set_scroll(0);
                app.ui.cursor = 0;
                app.ui.request_redraw(RedrawFlag::Main);
                self.check_sentinel(app);
            }

            // search
            Action::FocusSearch => {
                app.ui.mode = UIMode::Search;
                app.ui.request_redraw(RedrawFlag::All);
            }

            Action::BlurSearch => {
                app.ui.mode = UIMode::Browse;
                app.ui.request_redraw(RedrawFlag::All);
            }

            Action::SearchInsert(ch) => {
                app.ui.insert_char(ch);
                self.input_changed(app);
            }

            Action::SearchBackspace => {
                if app.ui.delete_char_before() {
                    self.input_changed(app);
                }
            }

            Action::QuickTopic(topic) => {
                debug!(topic, "Quick topic picked");
                app.ui.set_input(topic);
                self.input_changed(app);
            }

            Action::ClearSearch => {
                app.ui.clear_input();
                self.debouncer.cancel();
                let request = app.query.clear_search();
                app.ui.request_redraw(RedrawFlag::All);
                self.launch_opt(app, request);
            }

            Action::SettleSearch(fired) => {
                if self.debouncer.accept(&fired) {
                    let request = app.query.settle_search(&fired.value);
                    self.launch_opt(app, request);
                }
            }

            // category
            Action::OpenCategoryPicker => {
                if app.query.search_active() {
                    app.ui.show_info("Clear the search to pick a category");
                } else {
                    app.ui.category_cursor = app.query.category().index();
                    app.ui.overlay = UIOverlay::Category;
                    app.ui.request_redraw(RedrawFlag::Overlay);
                }
            }

            Action::MoveCategoryCursor(delta) => {
                let last = Category::ALL.len() - 1;
                app.ui.category_cursor = app
                    .ui
                    .category_cursor
                    .saturating_add_signed(delta)
                    .min(last);
                app.ui.request_redraw(RedrawFlag::Overlay);
            }

            Action::SelectCategory(category) => {
                app.ui.overlay = UIOverlay::None;
                app.ui.request_redraw(RedrawFlag::All);
                let request = app.query.select_category(category);
                self.launch_opt(app, request);
            }

            // detail
            Action::OpenDetail => {
                if let Some(photo) = app.cursor_photo() {
                    debug!(id = %photo.id, "Opening detail");
                    app.ui.open_detail(photo);
                }
            }

            Action::OpenTile(index) => {
                if let Some(photo) = app.feed.as_ref().and_then(|f| f.get(index)).cloned() {
                    app.ui.cursor = index;
                    debug!(id = %photo.id, "Opening detail from click");
                    app.ui.open_detail(photo);
                }
            }

            Action::CloseDetail => {
                app.ui.close_detail();
                self.check_sentinel(app);
            }

            Action::Download => self.download(app),

            Action::OpenLogo => self.open_logo(app),

            // overlays
            Action::ToggleHelp => {
                app.ui.overlay = match app.ui.overlay {
                    UIOverlay::Help => UIOverlay::None,
                    _ => UIOverlay::Help,
                };
                app.ui.request_redraw(RedrawFlag::All);
            }

            Action::CloseOverlay => {
                if app.ui.overlay == UIOverlay::Detail {
                    app.ui.close_detail();
                } else {
                    app.ui.overlay = UIOverlay::None;
                    app.ui.request_redraw(RedrawFlag::All);
                }
            }

            Action::DismissNotification => {
                app.ui.notification = None;
                app.ui.request_redraw(RedrawFlag::Notification);
            }

            Action::TaskResult(result) => self.task_result(app, result),
        }

        true
    }

    fn task_result(&mut self, app: &mut AppState, result: TaskResult) {
        match result {
            TaskResult::FetchCycle {
                request,
                result,
                elapsed,
            } => {
                debug!(?elapsed, page = request.page, "Fetch cycle reported");
                if let CycleOutcome::Applied { .. } = app.apply_cycle(&request, result) {
                    self.check_sentinel(app);
                }
            }

            TaskResult::Logo(Ok(logo)) => {
                app.ui.header.logo = Some(logo);
                app.ui.request_redraw(RedrawFlag::All);
            }

            TaskResult::Topics(Ok(topics)) => {
                app.ui.header.topics = topics;
                app.ui.request_redraw(RedrawFlag::All);
            }

            TaskResult::Logo(Err(e)) | TaskResult::Topics(Err(e)) => {
                warn!(error = %e, "Header content unavailable");
            }
        }
    }

    fn input_changed(&mut self, app: &mut AppState) {
        app.ui.request_redraw(RedrawFlag::All);
        match app.query.input_changed(&app.ui.input) {
            InputOutcome::Unchanged => {}
            InputOutcome::Debounce(term) => {
                self.debouncer.submit(term);
            }
            InputOutcome::Cleared(request) => {
                self.debouncer.cancel();
                self.launch_opt(app, request);
            }
        }
    }

    fn scroll(&mut self, app: &mut AppState, rows: i64) {
        let max = app.layout.max_offset(app.ui.viewport_height);
        if app.ui.scroll_by(rows, max) {
            self.check_sentinel(app);
        }
    }

    fn check_sentinel(&mut self, app: &mut AppState) {
        if let Some(request) = app.sentinel_check() {
            self.launch(app, request);
        }
    }

    fn download(&mut self, app: &mut AppState) {
        let Some(photo) = app.ui.selection.clone().or_else(|| app.cursor_photo()) else {
            return;
        };

        match (self.opener)(&photo.urls.raw) {
            Ok(()) => {
                self.stats.downloads += 1;
                info!(id = %photo.id, "Opened original for download");
                app.ui.show_success(format!("Opened original of {}", photo.id));
            }
            Err(e) => {
                warn!(id = %photo.id, error = %e, "Could not open download URL");
                app.ui.show_error(format!("Could not open browser: {e}"));
            }
        }
    }

    fn open_logo(&mut self, app: &mut AppState) {
        let Some(url) = app.ui.header.logo.as_ref().map(|l| l.urls.small.clone()) else {
            debug!("Logo not loaded yet");
            return;
        };

        if let Err(e) = (self.opener)(&url) {
            warn!(error = %e, "Could not open logo URL");
            app.ui.show_error(format!("Could not open browser: {e}"));
        }
    }

    fn launch_opt(&mut self, app: &mut AppState, request: Option<FetchRequest>) {
        if let Some(request) = request {
            self.launch(app, request);
        }
    }

    fn launch(&mut self, app: &mut AppState, request: FetchRequest) {
        let guard = app.query.loading().acquire();
        self.stats.cycles_launched += 1;
        spawn_fetch_cycle(
            Arc::clone(&self.api),
            request,
            self.params,
            guard,
            self.task_tx.clone(),
        );
        app.ui.request_redraw(RedrawFlag::StatusBar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::scripted::ScriptedApi;
    use crate::api::photo::{LogoPhoto, fixtures};
    use crate::model::feed_state::FeedBatch;
    use std::sync::Mutex;

    fn setup() -> (
        ActionDispatcher,
        AppState,
        mpsc::UnboundedReceiver<TaskResult>,
        Arc<ScriptedApi>,
    ) {
        let api = Arc::new(ScriptedApi::pages_of(15));
        let (tx, rx) = mpsc::unbounded_channel();
        let config = Config::default();
        let (dispatcher, _debounce_rx) =
            ActionDispatcher::new(Arc::clone(&api) as Arc<dyn PhotoApi>, &config, tx);
        let mut app = AppState::new(&config);
        app.set_terminal_size(120, 40);
        (dispatcher, app, rx, api)
    }

    fn seed_feed(app: &mut AppState) {
        let req = app.query.initial_request();
        app.apply_cycle(
            &req,
            Ok(FeedBatch {
                photos: fixtures::photos("seed", 30),
                total: 1500,
                total_pages: 100,
            }),
        );
    }

    #[tokio::test]
    async fn category_picker_blocked_during_search() {
        let (mut d, mut app, _rx, _api) = setup();
        d.handle(&mut app, Action::SearchInsert('a'));
        d.handle(&mut app, Action::OpenCategoryPicker);
        assert_eq!(app.ui.overlay, UIOverlay::None);
        assert!(app.ui.notification.is_some());
    }

    #[tokio::test]
    async fn selecting_a_category_launches_replace_cycle() {
        let (mut d, mut app, mut rx, api) = setup();
        seed_feed(&mut app);

        d.handle(&mut app, Action::OpenCategoryPicker);
        assert_eq!(app.ui.overlay, UIOverlay::Category);
        d.handle(&mut app, Action::MoveCategoryCursor(1));
        let picked = Category::from_index(app.ui.category_cursor);
        assert_eq!(picked, Category::New);
        d.handle(&mut app, Action::SelectCategory(picked));
        assert_eq!(app.ui.overlay, UIOverlay::None);
        assert!(app.query.is_loading());

        let Some(result) = rx.recv().await else {
            panic!("no fetch result");
        };
        d.handle(&mut app, Action::TaskResult(result));
        assert_eq!(app.photo_count(), 30);
        assert!(api.calls().iter().all(|c| c.query == "new" && c.order_by == Some("latest")));
    }

    #[tokio::test]
    async fn detail_locks_scroll_and_download_uses_raw_url() {
        let (d, mut app, _rx, _api) = setup();
        let opened = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&opened);
        let mut d = d.with_opener(Box::new(move |url: &str| {
            sink.lock().unwrap().push(url.to_string());
            Ok(())
        }));
        seed_feed(&mut app);

        d.handle(&mut app, Action::OpenDetail);
        assert!(app.ui.detail_open());
        let before = app.ui.scroll_offset;
        d.handle(&mut app, Action::ScrollBy(10));
        assert_eq!(app.ui.scroll_offset, before);

        d.handle(&mut app, Action::Download);
        let raw = app.ui.selection.as_ref().unwrap().urls.raw.clone();
        assert_eq!(*opened.lock().unwrap(), [raw]);

        d.handle(&mut app, Action::CloseDetail);
        assert!(app.ui.selection.is_none());
        d.handle(&mut app, Action::ScrollBy(10));
        assert_eq!(app.ui.scroll_offset, before + 10);
    }

    #[tokio::test]
    async fn logo_click_opens_small_variant_once_loaded() {
        let (d, mut app, _rx, _api) = setup();
        let opened = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&opened);
        let mut d = d.with_opener(Box::new(move |url: &str| {
            sink.lock().unwrap().push(url.to_string());
            Ok(())
        }));

        d.handle(&mut app, Action::OpenLogo);
        assert!(opened.lock().unwrap().is_empty());

        let logo = fixtures::photo("logo");
        app.ui.header.logo = Some(LogoPhoto {
            urls: logo.urls.clone(),
            color: logo.color.clone(),
        });
        d.handle(&mut app, Action::OpenLogo);
        assert_eq!(*opened.lock().unwrap(), [logo.urls.small]);
    }

    #[tokio::test]
    async fn failed_download_is_reported() {
        let (d, mut app, _rx, _api) = setup();
        let mut d = d.with_opener(Box::new(|_: &str| {
            Err(std::io::Error::other("no browser"))
        }));
        seed_feed(&mut app);

        d.handle(&mut app, Action::Download);
        let note = app.ui.notification.as_ref().unwrap();
        assert!(note.message.contains("no browser"));
    }

    #[tokio::test]
    async fn clearing_the_search_cancels_pending_debounce() {
        let (mut d, mut app, _rx, _api) = setup();
        d.handle(&mut app, Action::QuickTopic("Nature"));
        assert_eq!(app.ui.input, "Nature");
        assert!(d.debouncer.is_pending());

        d.handle(&mut app, Action::ClearSearch);
        assert!(!d.debouncer.is_pending());
        assert_eq!(app.ui.input, "");
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let (mut d, mut app, _rx, _api) = setup();
        assert!(!d.handle(&mut app, Action::Quit));
        d.shutdown(&mut app);
        assert!(!app.sentinel.is_observing());
    }
}
