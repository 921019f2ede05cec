use crate::error::{NicheError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the niche analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video platform API settings
    pub api: ApiConfig,

    /// Fetch limits for each analysis mode
    pub analysis: AnalysisConfig,

    /// Composite score tuning
    pub scoring: ScoringConfig,

    /// Report output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the YouTube Data API
    pub base_url: String,

    /// API key; never written back to disk
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Timeout for each outbound request (seconds)
    pub request_timeout_seconds: u64,

    /// Items requested per page and per statistics batch (API maximum is 50)
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum uploads to analyze for a channel
    pub channel_video_limit: usize,

    /// Maximum videos to analyze for a search phrase
    pub search_video_limit: usize,

    /// Maximum channels listed by channel discovery
    pub channel_search_limit: usize,
}

/// How the largest view count maps onto the market size score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketSizeCurve {
    /// `max_views / reference_view_count * 100`
    Linear,
    /// `log10(1 + max_views) / log10(1 + reference_view_count) * 100`
    Logarithmic,
}

/// Tunable constants of the composite scores
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// View count that maps to a market size score of 100
    pub reference_view_count: u64,

    /// Estimated revenue per item that maps to a profitability score of 100
    pub reference_revenue: f64,

    /// Baseline revenue per thousand views
    pub base_rpm: f64,

    /// RPM multiplier when engagement is at or above the threshold
    pub rpm_engagement_multiplier_high: f64,

    /// RPM multiplier when engagement is below the threshold
    pub rpm_engagement_multiplier_low: f64,

    /// Engagement rate (percent) that selects the high multiplier
    pub high_engagement_threshold: f64,

    pub market_size_curve: MarketSizeCurve,

    /// Number of tags kept in the ranked tag list
    pub top_tags: usize,

    /// Number of videos kept in the ranked video table
    pub top_videos: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            request_timeout_seconds: 10,
            page_size: 50,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            channel_video_limit: 50,
            search_video_limit: 50,
            channel_search_limit: 10,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reference_view_count: 100_000,
            reference_revenue: 500.0,
            base_rpm: 2.0,
            rpm_engagement_multiplier_high: 1.5,
            rpm_engagement_multiplier_low: 1.0,
            high_engagement_threshold: 4.0,
            market_size_curve: MarketSizeCurve::Linear,
            top_tags: 10,
            top_videos: 10,
        }
    }
}

impl Config {
    /// Load configuration from the first readable config file, then apply
    /// environment overrides. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let config_paths = ["niche-scout.toml", "config/niche-scout.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                return Self::load_from(path);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file, then apply environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| NicheError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut config: Config = toml::from_str(&config_str)?;
        tracing::info!("Loaded configuration from: {}", path.display());
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings with `NICHE_SCOUT_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("NICHE_SCOUT_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("NICHE_SCOUT_TIMEOUT") {
            self.api.request_timeout_seconds = parse_env("NICHE_SCOUT_TIMEOUT", &timeout)?;
        }

        if let Ok(limit) = std::env::var("NICHE_SCOUT_VIDEO_LIMIT") {
            let limit = parse_env("NICHE_SCOUT_VIDEO_LIMIT", &limit)?;
            self.analysis.channel_video_limit = limit;
            self.analysis.search_video_limit = limit;
        }

        if let Ok(rpm) = std::env::var("NICHE_SCOUT_BASE_RPM") {
            self.scoring.base_rpm = parse_env("NICHE_SCOUT_BASE_RPM", &rpm)?;
        }

        if let Ok(reference) = std::env::var("NICHE_SCOUT_REFERENCE_VIEWS") {
            self.scoring.reference_view_count = parse_env("NICHE_SCOUT_REFERENCE_VIEWS", &reference)?;
        }

        Ok(())
    }

    /// Save configuration to file. The API key is never written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_str =
            toml::to_string_pretty(self).map_err(|e| NicheError::Config(e.to_string()))?;
        std::fs::write(path, config_str)
            .map_err(|e| NicheError::Config(format!("cannot write {}: {}", path.display(), e)))?;
        tracing::info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.request_timeout_seconds == 0 {
            return Err(NicheError::Config("request_timeout_seconds must be greater than 0".into()));
        }

        if self.api.page_size == 0 || self.api.page_size > 50 {
            return Err(NicheError::Config("page_size must be between 1 and 50".into()));
        }

        let scoring = &self.scoring;
        if scoring.reference_view_count == 0 {
            return Err(NicheError::Config("reference_view_count must be greater than 0".into()));
        }

        if !(scoring.reference_revenue.is_finite() && scoring.reference_revenue > 0.0) {
            return Err(NicheError::Config("reference_revenue must be a positive number".into()));
        }

        for (name, value) in [
            ("base_rpm", scoring.base_rpm),
            ("rpm_engagement_multiplier_high", scoring.rpm_engagement_multiplier_high),
            ("rpm_engagement_multiplier_low", scoring.rpm_engagement_multiplier_low),
            ("high_engagement_threshold", scoring.high_engagement_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(NicheError::Config(format!("{} must be a non-negative number", name)));
            }
        }

        if scoring.top_tags == 0 || scoring.top_videos == 0 {
            return Err(NicheError::Config("top_tags and top_videos must be greater than 0".into()));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Niche Scout Configuration:\n\
            - API base URL: {}\n\
            - API key: {}\n\
            - Request timeout: {}s\n\
            - Channel video limit: {}\n\
            - Search video limit: {}\n\
            - Market size curve: {:?} (reference {} views)\n\
            - Base RPM: {:.2}",
            self.api.base_url,
            if self.api.api_key.is_some() { "set" } else { "not set" },
            self.api.request_timeout_seconds,
            self.analysis.channel_video_limit,
            self.analysis.search_video_limit,
            self.scoring.market_size_curve,
            self.scoring.reference_view_count,
            self.scoring.base_rpm,
        )
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| NicheError::Config(format!("{} has an invalid value: {}", name, value)))
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.api.api_key = Some(api_key);
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.api.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.api.request_timeout_seconds = seconds;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.config.api.page_size = page_size;
        self
    }

    pub fn with_video_limit(mut self, limit: usize) -> Self {
        self.config.analysis.channel_video_limit = limit;
        self.config.analysis.search_video_limit = limit;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
