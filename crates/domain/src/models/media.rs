//! Media library items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::SortOrder;
use validator::Validate;

/// A stored upload. `path` is relative to the media storage directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: i64,
    pub file_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub checksum: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

/// How the bot should send a media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaItem {
    pub fn kind(&self) -> MediaKind {
        media_kind(&self.mime_type)
    }

    /// Public URL Telegram can fetch the file from.
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// Maps a MIME type to the Bot API method family used to send it.
pub fn media_kind(mime_type: &str) -> MediaKind {
    match mime_type {
        "image/jpeg" | "image/png" | "image/webp" => MediaKind::Photo,
        m if m.starts_with("video/") => MediaKind::Video,
        _ => MediaKind::Document,
    }
}

/// Media item as returned by the API, with its public URL.
#[derive(Debug, Clone, Serialize)]
pub struct MediaResponse {
    #[serde(flatten)]
    pub item: MediaItem,
    pub url: String,
}

impl MediaResponse {
    pub fn new(item: MediaItem, base_url: &str) -> Self {
        let url = item.public_url(base_url);
        Self { item, url }
    }
}

/// Query string of `GET /media`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MediaQuery {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Per page must be between 1 and 100"))]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    /// Prefix match on MIME type, e.g. `image/`.
    pub mime_type: Option<String>,
    pub order: Option<SortOrder>,
}
