//! YouTube Data API access
//!
//! The API is consumed through three list resources (`channels`,
//! `playlistItems`, `videos`) plus `search`. [`VideoPlatformApi`] is the raw
//! page-level seam; [`CatalogFetcher`] layers pagination, batching and the
//! degrade-on-error policy on top of it.

pub mod client;
pub mod duration;
pub mod fetcher;
pub mod wire;

pub use client::YouTubeClient;
pub use duration::parse_duration;
pub use fetcher::CatalogFetcher;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a channel's public metadata and lifetime statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Handle or legacy custom URL, e.g. `@veritasium`
    pub custom_url: Option<String>,
    pub subscriber_count: u64,
    /// Channel owner hides the subscriber count; `subscriber_count` is 0
    pub hidden_subscriber_count: bool,
    pub view_count: u64,
    pub video_count: u64,
    pub thumbnail_url: Option<String>,
    /// Playlist holding every upload of the channel
    pub uploads_playlist_id: Option<String>,
}

/// One entry of an upload listing or a video search result page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingItem {
    pub id: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub channel_title: Option<String>,
}

/// Per-video statistics from the `videos` resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoStats {
    pub id: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
    pub tags: Vec<String>,
    pub category_id: Option<String>,
}

/// How a `channels` lookup selects its channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLookup {
    Ids(Vec<String>),
    Handle(String),
    Username(String),
}

/// Result type requested from `search`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Video,
    Channel,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Video => "video",
            SearchKind::Channel => "channel",
        }
    }
}

/// Parameters of one `search` page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub kind: SearchKind,
    pub max_results: u32,
    pub page_token: Option<String>,
}

/// Page-level access to the video platform API
#[async_trait]
pub trait VideoPlatformApi: Send + Sync {
    async fn list_channels(&self, lookup: &ChannelLookup) -> Result<wire::ChannelListResponse>;

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<wire::PlaylistItemListResponse>;

    async fn list_videos(&self, ids: &[String]) -> Result<wire::VideoListResponse>;

    async fn search(&self, request: &SearchRequest) -> Result<wire::SearchListResponse>;
}
