pub mod error;

pub mod config;

pub mod api {
    pub mod photo;
    pub use photo::{LogoPhoto, Photo, PhotoUrls, PhotoUser};

    pub mod client;
    pub use client::{Orientation, PhotoApi, SearchParams, UnsplashClient};
}

pub mod controller {

    pub mod actions;
    pub use actions::Action;

    pub mod action_dispatcher;
    pub use action_dispatcher::ActionDispatcher;

    pub mod event_loop;
    pub use event_loop::{EventLoop, TaskResult};

    pub mod feed_controller;

    pub mod scroll_trigger;
    pub use scroll_trigger::SentinelObserver;
}

pub mod model {
    pub mod app_state;

    pub mod category;
    pub use category::Category;

    pub mod feed_state;
    pub use feed_state::{FeedBatch, FeedCollection};

    pub mod masonry;
    pub use masonry::MasonryLayout;

    pub mod query_state;
    pub use query_state::{ApplyMode, EffectiveQuery, FetchRequest, QueryState};

    pub mod ui_state;
    pub use ui_state::{Notification, NotificationLevel, RedrawFlag, UIMode, UIOverlay, UIState};
}

pub mod tasks {
    pub mod fetch_task;

    pub mod startup_task;
}

pub mod util {
    pub mod debounce;

    pub mod humanize;
}

pub mod view {
    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod category_overlay;
        pub use category_overlay::OptimizedCategoryOverlay;
        pub mod detail_overlay;
        pub use detail_overlay::OptimizedDetailOverlay;
        pub mod header;
        pub use header::OptimizedHeader;
        pub mod help_overlay;
        pub use help_overlay::OptimizedHelpOverlay;
        pub mod loading_overlay;
        pub use loading_overlay::OptimizedLoadingOverlay;
        pub mod photo_grid;
        pub use photo_grid::OptimizedPhotoGrid;
        pub mod status_bar;
        pub use status_bar::OptimizedStatusBar;
    }

    pub use components::*;
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;

pub use model::{app_state::AppState, ui_state::UIState};
