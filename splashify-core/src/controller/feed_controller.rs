//! src/controller/feed_controller.rs
//! ============================================================================
//! # Fetch cycle: two concurrent searches, merge, shuffle
//!
//! One cycle asks for the same page of the effective query twice, once per
//! orientation. Both requests are in flight together and the cycle waits for
//! both to settle; either failing fails the whole cycle.

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument};

use crate::{
    api::{
        client::{Orientation, PhotoApi, SearchParams},
        photo::SearchPhotosResponse,
    },
    config::ApiConfig,
    error::AppError,
    model::{feed_state::FeedBatch, query_state::FetchRequest},
};

/// Per-request knobs that do not depend on the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchParams {
    pub per_page: u32,
    pub height_hint: u32,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for FetchParams {
    fn from(cfg: &ApiConfig) -> Self {
        Self {
            per_page: cfg.per_page,
            height_hint: cfg.image_height_hint,
        }
    }
}

/// Search parameters for one orientation of `request`.
pub fn search_params(
    request: &FetchRequest,
    orientation: Orientation,
    params: &FetchParams,
) -> SearchParams {
    SearchParams {
        query: request.query.term().into(),
        order_by: request.query.order_by(),
        orientation,
        per_page: params.per_page,
        page: request.page,
        height_hint: params.height_hint,
    }
}

/// Portrait results then landscape results, shuffled as one sequence
/// (Fisher–Yates via `SliceRandom`).
/// Totals come from the portrait response.
pub fn merge_and_shuffle<R: Rng + ?Sized>(
    portrait: SearchPhotosResponse,
    landscape: SearchPhotosResponse,
    rng: &mut R,
) -> FeedBatch {
    let mut photos = portrait.results;
    photos.extend(landscape.results);
    photos.shuffle(rng);

    FeedBatch {
        photos,
        total: portrait.total,
        total_pages: portrait.total_pages,
    }
}

#[instrument(
    level = "info",
    skip(api, request, params),
    fields(query = request.query.term(), page = request.page, generation = request.generation)
)]
pub async fn run_fetch_cycle(
    api: &dyn PhotoApi,
    request: &FetchRequest,
    params: &FetchParams,
) -> Result<FeedBatch, AppError> {
    let portrait = search_params(request, Orientation::Portrait, params);
    let landscape = search_params(request, Orientation::Landscape, params);

    let (portrait, landscape) = tokio::join!(api.search(&portrait), api.search(&landscape));
    let (portrait, landscape) = (portrait?, landscape?);

    debug!(
        portrait = portrait.results.len(),
        landscape = landscape.results.len(),
        "Both orientations settled"
    );
    Ok(merge_and_shuffle(portrait, landscape, &mut rand::rng()))
}
