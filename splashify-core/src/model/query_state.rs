//! src/model/query_state.rs
//! ============================================================================
//! # QueryState: effective query, pagination and the loading flag
//!
//! All transitions are plain methods returning the [`FetchRequest`] the
//! caller must launch, if any. A change of the effective query always bumps
//! the generation, resets the page to 1 and arms replace mode *before* the
//! request is built, so the next cycle can never append to a stale feed.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use compact_str::CompactString;
use tracing::{debug, trace};

use crate::model::category::Category;

/// The term actually sent to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveQuery {
    Search(CompactString),
    Category(Category),
}

impl EffectiveQuery {
    pub fn term(&self) -> &str {
        match self {
            Self::Search(term) => term,
            Self::Category(category) => category.query(),
        }
    }

    pub const fn order_by(&self) -> Option<&'static str> {
        match self {
            Self::Search(_) => None,
            Self::Category(category) => Some(category.order_by()),
        }
    }
}

/// Whether a completed cycle replaces or extends the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Replace,
    Append,
}

/// One fetch cycle to launch, tagged with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: EffectiveQuery,
    pub page: u32,
    pub mode: ApplyMode,
    pub generation: u64,
}

/// Shared in-flight counter. Loading is true while any guard is alive.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicUsize>);

impl LoadingFlag {
    #[must_use = "loading clears as soon as the guard is dropped"]
    pub fn acquire(&self) -> LoadingGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        LoadingGuard(Arc::clone(&self.0))
    }

    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }
}

/// Releases one in-flight slot on drop, on every exit path.
#[derive(Debug)]
pub struct LoadingGuard(Arc<AtomicUsize>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Result of editing the raw search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Text is the same as before.
    Unchanged,
    /// Non-empty text: schedule a debounced settle with this value.
    Debounce(CompactString),
    /// Text became empty: the search was cleared right away.
    Cleared(Option<FetchRequest>),
}

#[derive(Debug, Clone)]
pub struct QueryState {
    search_input: String,
    settled_search: CompactString,
    category: Category,
    effective: EffectiveQuery,
    page: u32,
    replace_next: bool,
    generation: u64,
    total_pages: Option<u32>,
    loading: LoadingFlag,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    pub fn new() -> Self {
        let category = Category::default();
        Self {
            search_input: String::new(),
            settled_search: CompactString::default(),
            category,
            effective: EffectiveQuery::Category(category),
            page: 1,
            replace_next: true,
            generation: 0,
            total_pages: None,
            loading: LoadingFlag::default(),
        }
    }

    /// Settled search term when non-empty, else the selected category.
    pub fn effective_query(&self) -> EffectiveQuery {
        if self.settled_search.is_empty() {
            EffectiveQuery::Category(self.category)
        } else {
            EffectiveQuery::Search(self.settled_search.clone())
        }
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn loading(&self) -> &LoadingFlag {
        &self.loading
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// A free-text search is typed or in effect; the category does not apply.
    pub fn search_active(&self) -> bool {
        !self.search_input.trim().is_empty() || !self.settled_search.is_empty()
    }

    /// First cycle after startup: page 1, replace mode.
    pub fn initial_request(&mut self) -> FetchRequest {
        self.page = 1;
        self.replace_next = true;
        self.request()
    }

    /// Raw text edit from the search box.
    pub fn input_changed(&mut self, text: &str) -> InputOutcome {
        if text == self.search_input {
            return InputOutcome::Unchanged;
        }
        self.search_input = text.to_string();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            InputOutcome::Cleared(self.reset_search())
        } else {
            InputOutcome::Debounce(CompactString::from(trimmed))
        }
    }

    /// The debounce window elapsed with `term` as the last input.
    pub fn settle_search(&mut self, term: &str) -> Option<FetchRequest> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        self.settled_search = CompactString::from(term);
        self.recompute()
    }

    /// Empty the search box. The category falls back to the first option.
    pub fn clear_search(&mut self) -> Option<FetchRequest> {
        self.search_input.clear();
        self.reset_search()
    }

    /// Pick a category. Ignored while a free-text search is active.
    pub fn select_category(&mut self, category: Category) -> Option<FetchRequest> {
        if self.search_active() {
            debug!(%category, "Category ignored while search is active");
            return None;
        }
        self.category = category;
        self.recompute()
    }

    /// Sentinel became visible: next page in append mode, unless a cycle is
    /// already in flight. The reported page count does not gate paging.
    pub fn sentinel_triggered(&mut self) -> Option<FetchRequest> {
        if self.is_loading() {
            trace!("Sentinel trigger ignored: fetch in flight");
            return None;
        }

        self.page += 1;
        debug!(page = self.page, "Advancing page");
        Some(self.request())
    }

    /// A completed cycle may only be applied to the generation it was issued for.
    pub fn accepts(&self, request: &FetchRequest) -> bool {
        request.generation == self.generation
    }

    /// Bookkeeping after a cycle was applied to the feed.
    pub fn record_applied(&mut self, request: &FetchRequest, total_pages: u32) {
        if request.mode == ApplyMode::Replace {
            self.replace_next = false;
        }
        self.total_pages = Some(total_pages);
    }

    fn reset_search(&mut self) -> Option<FetchRequest> {
        self.settled_search = CompactString::default();
        self.category = Category::default();
        self.recompute()
    }

    fn recompute(&mut self) -> Option<FetchRequest> {
        let next = self.effective_query();
        if next == self.effective {
            trace!(query = next.term(), "Effective query unchanged");
            return None;
        }

        debug!(from = self.effective.term(), to = next.term(), "Effective query changed");
        self.effective = next;
        self.replace_next = true;
        self.page = 1;
        self.generation += 1;
        self.total_pages = None;

        Some(self.request())
    }

    fn request(&self) -> FetchRequest {
        FetchRequest {
            query: self.effective.clone(),
            page: self.page,
            mode: if self.replace_next {
                ApplyMode::Replace
            } else {
                ApplyMode::Append
            },
            generation: self.generation,
        }
    }
}
