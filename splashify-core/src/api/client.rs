//! src/api/client.rs
//! ============================================================================
//! # Photo API client
//!
//! [`PhotoApi`] is the seam between the feed controller and the network.
//! [`UnsplashClient`] is the production implementation: one configured
//! `reqwest::Client` shared by every request of the program.

use std::fmt;

use async_trait::async_trait;
use compact_str::CompactString;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::{
    api::photo::{LogoPhoto, SearchPhotosResponse, Topic},
    config::ApiConfig,
    error::AppError,
};

/// Up to this many trending topic titles are kept.
pub const MAX_TRENDING_TOPICS: usize = 4;

pub type TopicTitles = SmallVec<[CompactString; MAX_TRENDING_TOPICS]>;

/// Orientation filter of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page request against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: CompactString,
    pub order_by: Option<&'static str>,
    pub orientation: Orientation,
    pub per_page: u32,
    pub page: u32,
    pub height_hint: u32,
}

#[async_trait]
pub trait PhotoApi: Send + Sync {
    /// `GET /search/photos`.
    async fn search(&self, params: &SearchParams) -> Result<SearchPhotosResponse, AppError>;

    /// `GET /photos/random`, used for the header logo.
    async fn random_photo(&self) -> Result<LogoPhoto, AppError>;

    /// Featured topics, trimmed to [`MAX_TRENDING_TOPICS`] titles.
    async fn trending_topics(&self) -> Result<TopicTitles, AppError>;
}

/// `reqwest`-backed client for the Unsplash v1 API.
#[derive(Clone)]
pub struct UnsplashClient {
    http: Client,
    base_url: String,
}

impl fmt::Debug for UnsplashClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the default headers carry the access key
        f.debug_struct("UnsplashClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UnsplashClient {
    pub fn new(config: &ApiConfig, access_key: &str) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut auth = header::HeaderValue::from_str(&format!("Client-ID {access_key}"))
            .map_err(|_| AppError::Other("access key contains invalid header characters".into()))?;
        auth.set_sensitive(true);

        headers.insert(header::AUTHORIZATION, auth);
        headers.insert("Accept-Version", header::HeaderValue::from_static("v1"));

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::status(path, status.as_u16(), &body));
        }

        debug!(path, status = status.as_u16(), bytes = body.len(), "API response");
        serde_json::from_str(&body).map_err(|e| AppError::decode(path, e))
    }
}

#[async_trait]
impl PhotoApi for UnsplashClient {
    #[instrument(level = "debug", skip(self), fields(query = %params.query, orientation = %params.orientation, page = params.page))]
    async fn search(&self, params: &SearchParams) -> Result<SearchPhotosResponse, AppError> {
        let mut query = vec![
            ("query", params.query.to_string()),
            ("orientation", params.orientation.as_str().to_string()),
            ("per_page", params.per_page.to_string()),
            ("page", params.page.to_string()),
            ("h", params.height_hint.to_string()),
        ];
        if let Some(order_by) = params.order_by {
            query.push(("order_by", order_by.to_string()));
        }

        self.get_json("/search/photos", &query).await
    }

    async fn random_photo(&self) -> Result<LogoPhoto, AppError> {
        self.get_json("/photos/random", &[]).await
    }

    async fn trending_topics(&self) -> Result<TopicTitles, AppError> {
        let topics: Vec<Topic> = self
            .get_json(
                "/topics",
                &[
                    ("order_by", "featured".to_string()),
                    ("per_page", MAX_TRENDING_TOPICS.to_string()),
                ],
            )
            .await?;

        Ok(topics
            .into_iter()
            .take(MAX_TRENDING_TOPICS)
            .map(|t| t.title)
            .collect())
    }
}
