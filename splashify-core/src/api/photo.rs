//! src/api/photo.rs
//! ============================================================================
//! # Photo records and API response envelopes
//!
//! Shapes follow the Unsplash v1 JSON. Fields the API may send as `null`
//! are `Option`s; unknown fields are ignored.

use chrono::{DateTime, FixedOffset};
use compact_str::CompactString;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// URL variants of one photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub raw: String,
    pub regular: String,
    pub small: String,
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

impl PhotoUrls {
    /// Best variant for the detail view: large, then full, then regular.
    #[must_use]
    pub fn display(&self) -> &str {
        self.large
            .as_deref()
            .or(self.full.as_deref())
            .unwrap_or(&self.regular)
    }
}

/// The uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUser {
    pub username: CompactString,
    pub name: CompactString,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: CompactString,
    pub width: u32,
    pub height: u32,
    pub urls: PhotoUrls,
    #[serde(default)]
    pub color: Option<String>,
    pub user: PhotoUser,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    pub created_at: String,
}

impl Photo {
    /// `created_at` parsed with its own UTC offset preserved.
    #[must_use]
    pub fn uploaded_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }

    /// Dominant color as a terminal color, if the API sent a valid `#rrggbb`.
    #[must_use]
    pub fn swatch(&self) -> Option<Color> {
        parse_hex_color(self.color.as_deref()?)
    }

    /// Height over width, 1.0 for degenerate dimensions.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.height as f32 / self.width as f32
        }
    }
}

/// `#rrggbb` → `Color::Rgb`.
#[must_use]
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Body of `GET /search/photos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPhotosResponse {
    pub total: u64,
    pub total_pages: u32,
    pub results: Vec<Photo>,
}

/// Element of `GET /topics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: CompactString,
    #[serde(default)]
    pub slug: CompactString,
    pub title: CompactString,
}

/// The subset of `GET /photos/random` used for the header logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoPhoto {
    pub urls: PhotoUrls,
    #[serde(default)]
    pub color: Option<String>,
}
