//! Niche Scout - YouTube niche research
//!
//! Fetches channel and topic statistics from the YouTube Data API and turns
//! them into market size, saturation and profitability scores.

pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod youtube;

// Re-export main types for easy access
pub use crate::analysis::{aggregate, join_records, NicheMetrics, ScoreBand, VideoRecord};
pub use crate::config::{Config, ConfigBuilder, OutputFormat, ScoringConfig};
pub use crate::error::{NicheError, Result};
pub use crate::pipeline::{AnalysisReport, ChannelReport, ChannelSearchReport, NicheAnalyzer, NicheReport};
pub use crate::resolver::{resolve_channel_url, ChannelQuery, ChannelRef};
pub use crate::youtube::{CatalogFetcher, ChannelSummary, VideoPlatformApi, YouTubeClient};
