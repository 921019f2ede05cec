//! Metric aggregation over joined video records
//!
//! [`aggregate`] is a pure function of its inputs: the same records, channel
//! and scoring configuration always produce the same [`NicheMetrics`].

pub mod join;
pub mod scores;
pub mod tags;

pub use join::join_records;
pub use scores::ScoreBand;
pub use tags::{rank_tags, TagCount};

use crate::config::ScoringConfig;
use crate::error::{NicheError, Result};
use crate::youtube::{ChannelSummary, ListingItem, VideoStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One video after listing and statistics data are joined
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
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

impl VideoRecord {
    /// Record with listing fields only; statistics are zero
    pub fn from_listing(item: ListingItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            published_at: item.published_at,
            channel_id: None,
            channel_title: item.channel_title,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            duration_seconds: 0,
            tags: Vec::new(),
            category_id: None,
        }
    }

    /// Likes plus comments per hundred views
    pub fn engagement_rate(&self) -> f64 {
        scores::engagement_rate(
            self.like_count as f64,
            self.comment_count as f64,
            self.view_count as f64,
        )
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

impl From<VideoStats> for VideoRecord {
    fn from(stats: VideoStats) -> Self {
        Self {
            id: stats.id,
            title: stats.title,
            published_at: stats.published_at,
            channel_id: stats.channel_id,
            channel_title: stats.channel_title,
            view_count: stats.view_count,
            like_count: stats.like_count,
            comment_count: stats.comment_count,
            duration_seconds: stats.duration_seconds,
            tags: stats.tags,
            category_id: stats.category_id,
        }
    }
}

/// Derived indicators for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NicheMetrics {
    pub record_count: usize,
    pub total_views: u64,
    pub max_views: u64,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_duration_seconds: f64,
    /// Percent
    pub engagement_rate: f64,
    /// Average views per subscriber, when the subscriber count is known
    pub reach_ratio: Option<f64>,
    pub market_size_score: f64,
    pub saturation_score: f64,
    pub profitability_score: f64,
    pub estimated_rpm: f64,
    pub estimated_revenue_per_video: f64,
    pub top_tags: Vec<TagCount>,
    pub top_videos: Vec<VideoRecord>,
}

impl NicheMetrics {
    pub fn market_size_band(&self) -> ScoreBand {
        ScoreBand::of(self.market_size_score)
    }

    pub fn saturation_band(&self) -> ScoreBand {
        ScoreBand::of(self.saturation_score)
    }

    pub fn profitability_band(&self) -> ScoreBand {
        ScoreBand::of(self.profitability_score)
    }
}

/// Compute niche metrics for a non-empty record set.
///
/// `channel` supplies the subscriber count for the saturation score; without
/// it (or with a hidden count) saturation falls back to the neutral default.
pub fn aggregate(
    records: &[VideoRecord],
    channel: Option<&ChannelSummary>,
    scoring: &ScoringConfig,
) -> Result<NicheMetrics> {
    if records.is_empty() {
        return Err(NicheError::InsufficientData(
            "no videos to analyze".to_string(),
        ));
    }

    let total_views: u64 = records.iter().fold(0u64, |acc, r| acc.saturating_add(r.view_count));
    let max_views = records.iter().map(|r| r.view_count).max().unwrap_or(0);

    let avg_views = mean(records, |r| r.view_count);
    let avg_likes = mean(records, |r| r.like_count);
    let avg_comments = mean(records, |r| r.comment_count);
    let avg_duration_seconds = mean(records, |r| r.duration_seconds);

    let engagement_rate = scores::engagement_rate(avg_likes, avg_comments, avg_views);

    let subscribers = channel
        .filter(|c| !c.hidden_subscriber_count)
        .map(|c| c.subscriber_count);
    let reach_ratio = scores::reach_ratio(avg_views, subscribers);

    let estimated_rpm = scores::estimated_rpm(engagement_rate, scoring);
    let estimated_revenue_per_video = scores::revenue_per_item(avg_views, estimated_rpm);

    let mut top_videos = records.to_vec();
    top_videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    top_videos.truncate(scoring.top_videos);

    Ok(NicheMetrics {
        record_count: records.len(),
        total_views,
        max_views,
        avg_views,
        avg_likes,
        avg_comments,
        avg_duration_seconds,
        engagement_rate,
        reach_ratio,
        market_size_score: scores::market_size_score(max_views, scoring),
        saturation_score: scores::saturation_score(reach_ratio),
        profitability_score: scores::profitability_score(estimated_revenue_per_video, scoring),
        estimated_rpm,
        estimated_revenue_per_video,
        top_tags: rank_tags(records.iter().map(|r| r.tags.as_slice()), scoring.top_tags),
        top_videos,
    })
}

fn mean(records: &[VideoRecord], field: impl Fn(&VideoRecord) -> u64) -> f64 {
    records.iter().map(|r| field(r) as f64).sum::<f64>() / records.len() as f64
}
