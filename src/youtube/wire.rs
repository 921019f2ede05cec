//! Response bodies of the YouTube Data API v3.
//!
//! Every field the analysis does not strictly need is optional or defaulted,
//! and counts arrive as strings, so a sparse response never fails to decode.

use super::{duration::parse_duration, ChannelSummary, ListingItem, VideoStats};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    #[serde(default)]
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: ChannelStatistics,
    #[serde(default)]
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelSnippet {
    pub title: String,
    pub description: String,
    pub custom_url: Option<String>,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelStatistics {
    pub view_count: Option<String>,
    pub subscriber_count: Option<String>,
    pub hidden_subscriber_count: bool,
    pub video_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
    pub content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistItemSnippet {
    pub title: String,
    pub published_at: Option<String>,
    pub channel_title: Option<String>,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaylistItemContentDetails {
    pub video_id: Option<String>,
    pub video_published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
    #[serde(default)]
    pub content_details: VideoContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSnippet {
    pub title: String,
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub tags: Vec<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VideoContentDetails {
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResultId {
    pub kind: String,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSnippet {
    pub title: String,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub code: u16,
    pub message: String,
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorDetail {
    pub reason: String,
    pub domain: String,
    pub message: String,
}

impl ApiErrorBody {
    /// First machine-readable reason, if any
    pub fn reason(&self) -> &str {
        self.errors
            .iter()
            .map(|e| e.reason.as_str())
            .find(|r| !r.is_empty())
            .unwrap_or("")
    }
}

/// Parse a textual count; missing or malformed values are zero
pub fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(0)
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

impl From<ChannelItem> for ChannelSummary {
    fn from(item: ChannelItem) -> Self {
        let thumbnails = item.snippet.thumbnails;
        let thumbnail_url = thumbnails
            .high
            .or(thumbnails.medium)
            .or(thumbnails.default)
            .map(|t| t.url);

        Self {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            custom_url: item.snippet.custom_url,
            subscriber_count: parse_count(item.statistics.subscriber_count.as_deref()),
            hidden_subscriber_count: item.statistics.hidden_subscriber_count,
            view_count: parse_count(item.statistics.view_count.as_deref()),
            video_count: parse_count(item.statistics.video_count.as_deref()),
            thumbnail_url,
            uploads_playlist_id: item.content_details.related_playlists.uploads,
        }
    }
}

impl From<VideoItem> for VideoStats {
    fn from(item: VideoItem) -> Self {
        Self {
            duration_seconds: item
                .content_details
                .duration
                .as_deref()
                .map(parse_duration)
                .unwrap_or(0),
            view_count: parse_count(item.statistics.view_count.as_deref()),
            like_count: parse_count(item.statistics.like_count.as_deref()),
            comment_count: parse_count(item.statistics.comment_count.as_deref()),
            published_at: parse_timestamp(item.snippet.published_at.as_deref()),
            id: item.id,
            title: item.snippet.title,
            channel_id: item.snippet.channel_id,
            channel_title: item.snippet.channel_title,
            tags: item.snippet.tags,
            category_id: item.snippet.category_id,
        }
    }
}

impl PlaylistItem {
    /// Listing entry for this item; `None` when the item carries no video id
    pub fn into_listing(self) -> Option<ListingItem> {
        let details = self.content_details.unwrap_or_default();
        let id = details
            .video_id
            .or(self.snippet.resource_id.video_id)
            .filter(|id| !id.is_empty())?;

        let published_at = parse_timestamp(details.video_published_at.as_deref())
            .or_else(|| parse_timestamp(self.snippet.published_at.as_deref()));

        Some(ListingItem {
            id,
            title: self.snippet.title,
            published_at,
            channel_title: self.snippet.channel_title,
        })
    }
}

impl SearchResult {
    /// Id of the video or channel this result points at
    pub fn target_id(&self) -> Option<&str> {
        self.id
            .video_id
            .as_deref()
            .or(self.id.channel_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn into_listing(self) -> Option<ListingItem> {
        let id = self.target_id()?.to_string();
        Some(ListingItem {
            id,
            title: self.snippet.title,
            published_at: parse_timestamp(self.snippet.published_at.as_deref()),
            channel_title: self.snippet.channel_title,
        })
    }
}
