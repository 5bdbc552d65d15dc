//! src/model/feed_state.rs
//! ============================================================================
//! # FeedCollection: the displayed photo sequence
//!
//! Insertion order is display order. Only completed fetch cycles mutate it,
//! through [`FeedCollection::apply`].

use std::sync::Arc;

use tracing::debug;

use crate::{api::photo::Photo, model::query_state::ApplyMode};

/// Merged, shuffled output of one fetch cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatch {
    pub photos: Vec<Photo>,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FeedCollection {
    photos: Vec<Arc<Photo>>,
    total: u64,
    total_pages: u32,
}

impl FeedCollection {
    /// Replace or extend the collection with a cycle's batch.
    pub fn apply(&mut self, batch: FeedBatch, mode: ApplyMode) {
        let incoming = batch.photos.into_iter().map(Arc::new);
        match mode {
            ApplyMode::Replace => {
                self.photos = incoming.collect();
            }
            ApplyMode::Append => {
                self.photos.extend(incoming);
            }
        }
        self.total = batch.total;
        self.total_pages = batch.total_pages;

        debug!(?mode, len = self.photos.len(), total = self.total, "Feed updated");
    }

    pub fn photos(&self) -> &[Arc<Photo>] {
        &self.photos
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Photo>> {
        self.photos.get(index)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::photo::fixtures;

    fn batch(prefix: &str, n: usize, total_pages: u32) -> FeedBatch {
        FeedBatch {
            photos: fixtures::photos(prefix, n),
            total: u64::from(total_pages) * 15,
            total_pages,
        }
    }

    fn ids(feed: &FeedCollection) -> Vec<String> {
        feed.photos().iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn replace_discards_previous_photos() {
        let mut feed = FeedCollection::default();
        feed.apply(batch("a", 30, 10), ApplyMode::Replace);
        feed.apply(batch("b", 4, 2), ApplyMode::Replace);

        assert_eq!(ids(&feed), ["b-0", "b-1", "b-2", "b-3"]);
        assert_eq!(feed.total_pages(), 2);
    }

    #[test]
    fn append_preserves_existing_order() {
        let mut feed = FeedCollection::default();
        feed.apply(batch("a", 3, 10), ApplyMode::Replace);
        let before = ids(&feed);

        feed.apply(batch("b", 2, 11), ApplyMode::Append);

        let after = ids(&feed);
        assert_eq!(&after[..3], &before[..]);
        assert_eq!(&after[3..], ["b-0", "b-1"]);
        assert_eq!(feed.total_pages(), 11);
    }

    #[test]
    fn empty_batch_still_updates_metadata() {
        let mut feed = FeedCollection::default();
        feed.apply(batch("a", 2, 5), ApplyMode::Replace);
        feed.apply(batch("b", 0, 5), ApplyMode::Append);

        assert_eq!(ids(&feed), ["a-0", "a-1"]);
        assert_eq!(feed.total_pages(), 5);
    }
}
