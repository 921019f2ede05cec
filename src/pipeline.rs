use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::analysis::{aggregate, join_records, NicheMetrics};
use crate::config::Config;
use crate::error::{NicheError, Result};
use crate::resolver::{ChannelQuery, ChannelRef};
use crate::youtube::{CatalogFetcher, ChannelSummary, ListingItem};

/// Analysis of one channel's recent uploads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel: ChannelSummary,
    pub metrics: NicheMetrics,
    pub generated_at: DateTime<Utc>,
    pub fetch_time: Duration,
}

/// Analysis of the videos returned for a search phrase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicheReport {
    pub query: String,
    pub metrics: NicheMetrics,
    pub generated_at: DateTime<Utc>,
    pub fetch_time: Duration,
}

/// Channels competing for a search phrase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSearchReport {
    pub query: String,
    pub channels: Vec<ChannelSummary>,
    pub generated_at: DateTime<Utc>,
    pub fetch_time: Duration,
}

/// Result of one analysis invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisReport {
    Channel(ChannelReport),
    Niche(NicheReport),
    Channels(ChannelSearchReport),
}

/// Parameterized analysis pipeline: resolve, fetch, join, aggregate.
///
/// Owns the fetcher (and through it the API client) for as long as the
/// caller keeps the analyzer; nothing is shared between invocations.
pub struct NicheAnalyzer {
    fetcher: CatalogFetcher,
    config: Config,
}

impl NicheAnalyzer {
    pub fn new(fetcher: CatalogFetcher, config: Config) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze free-form input: a channel URL, id or handle, or a search phrase
    pub async fn analyze_input(&self, input: &str, limit: Option<usize>) -> Result<AnalysisReport> {
        match ChannelQuery::parse(input)? {
            ChannelQuery::Channel(channel) => {
                let limit = limit.unwrap_or(self.config.analysis.channel_video_limit);
                self.analyze_channel(&channel, limit).await.map(AnalysisReport::Channel)
            }
            ChannelQuery::Search(phrase) => {
                let limit = limit.unwrap_or(self.config.analysis.search_video_limit);
                self.analyze_search(&phrase, limit).await.map(AnalysisReport::Niche)
            }
        }
    }

    /// Channel summary, upload listing, statistics, then metrics
    pub async fn analyze_channel(&self, channel: &ChannelRef, limit: usize) -> Result<ChannelReport> {
        let start_time = Instant::now();

        let channel_id = self.fetcher.resolve_channel_id(channel).await?;
        let summary = self.fetcher.fetch_channel_summary(&channel_id).await?;
        info!(
            "📺 Channel '{}' ({} subscribers, {} videos)",
            summary.title, summary.subscriber_count, summary.video_count
        );

        let listing = match (&summary.uploads_playlist_id, limit) {
            (_, 0) => Vec::new(),
            (Some(playlist_id), _) => self.fetcher.fetch_playlist_listing(playlist_id, limit).await?,
            (None, _) => {
                warn!("Channel {} exposes no upload listing", summary.id);
                Vec::new()
            }
        };

        let metrics = self.collect_metrics(listing, Some(&summary)).await?;
        info!("✅ Analyzed {} videos of '{}'", metrics.record_count, summary.title);

        Ok(ChannelReport {
            channel: summary,
            metrics,
            generated_at: Utc::now(),
            fetch_time: start_time.elapsed(),
        })
    }

    /// Video search, statistics, then metrics. Saturation stays neutral
    /// because no single subscriber base applies.
    pub async fn analyze_search(&self, phrase: &str, limit: usize) -> Result<NicheReport> {
        let start_time = Instant::now();
        let phrase = validate_phrase(phrase)?;

        let listing = self.fetcher.search_video_ids(phrase, limit).await?;
        let metrics = self.collect_metrics(listing, None).await?;
        info!("✅ Analyzed {} videos for '{}'", metrics.record_count, phrase);

        Ok(NicheReport {
            query: phrase.to_string(),
            metrics,
            generated_at: Utc::now(),
            fetch_time: start_time.elapsed(),
        })
    }

    /// Channels matching a phrase, with subscriber, view and video counts
    pub async fn discover_channels(&self, phrase: &str, limit: usize) -> Result<ChannelSearchReport> {
        let start_time = Instant::now();
        let phrase = validate_phrase(phrase)?;

        let channels = self.fetcher.search_channels(phrase, limit).await?;
        if channels.is_empty() {
            return Err(NicheError::NotFound(format!("no channels match '{}'", phrase)));
        }

        Ok(ChannelSearchReport {
            query: phrase.to_string(),
            channels,
            generated_at: Utc::now(),
            fetch_time: start_time.elapsed(),
        })
    }

    async fn collect_metrics(
        &self,
        listing: Vec<ListingItem>,
        channel: Option<&ChannelSummary>,
    ) -> Result<NicheMetrics> {
        if listing.is_empty() {
            return Err(NicheError::InsufficientData("no videos were listed".to_string()));
        }

        let ids: Vec<String> = listing.iter().map(|item| item.id.clone()).collect();
        let stats = self.fetcher.fetch_item_statistics(&ids).await?;
        if stats.len() < ids.len() {
            warn!("Statistics missing for {} of {} videos", ids.len() - stats.len(), ids.len());
        }

        let records = join_records(listing, stats);
        aggregate(&records, channel, &self.config.scoring)
    }
}

fn validate_phrase(phrase: &str) -> Result<&str> {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return Err(NicheError::InvalidInput("search phrase is empty".to_string()));
    }
    Ok(phrase)
}
