//! Report rendering: text for the terminal, Markdown for sharing, JSON for tools.

use crate::analysis::{NicheMetrics, ScoreBand};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::pipeline::{AnalysisReport, ChannelReport, ChannelSearchReport, NicheReport};
use crate::youtube::duration::format_duration;
use crate::youtube::ChannelSummary;
use serde::Serialize;

const GAUGE_WIDTH: usize = 20;
const TITLE_WIDTH: usize = 48;

/// View volumes shown in the revenue tier table
pub const REVENUE_TIERS: [u64; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Estimated revenue for a view volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueTier {
    pub views: u64,
    pub revenue: f64,
}

/// Revenue at 1K, 10K, 100K and 1M views for the given RPM
pub fn revenue_tiers(rpm: f64) -> Vec<RevenueTier> {
    REVENUE_TIERS
        .iter()
        .map(|&views| RevenueTier {
            views,
            revenue: rpm * views as f64 / 1000.0,
        })
        .collect()
}

/// Render a report in the requested format
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(match report {
            AnalysisReport::Channel(r) => channel_text(r),
            AnalysisReport::Niche(r) => niche_text(r),
            AnalysisReport::Channels(r) => channels_text(r),
        }),
        OutputFormat::Markdown => Ok(match report {
            AnalysisReport::Channel(r) => channel_markdown(r),
            AnalysisReport::Niche(r) => niche_markdown(r),
            AnalysisReport::Channels(r) => channels_markdown(r),
        }),
    }
}

/// Thousands-separated integer, e.g. `1,234,567`
pub fn format_number(number: u64) -> String {
    let digits = number.to_string();
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Bar of `width` cells filled in proportion to a 0-100 score
pub fn gauge(score: f64, width: usize) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

fn channel_text(report: &ChannelReport) -> String {
    let channel = &report.channel;
    let mut content = String::new();

    content.push_str(&format!("Channel: {} ({})\n", channel.title, channel.id));
    content.push_str(&format!(
        "Subscribers: {}   Lifetime views: {}   Videos: {}\n",
        subscriber_text(channel),
        format_number(channel.view_count),
        format_number(channel.video_count)
    ));
    content.push('\n');
    metrics_text(&mut content, &report.metrics);
    content.push_str(&format!(
        "\nGenerated {} in {:.1}s\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.fetch_time.as_secs_f64()
    ));
    content
}

fn niche_text(report: &NicheReport) -> String {
    let mut content = String::new();

    content.push_str(&format!("Niche: \"{}\"\n\n", report.query));
    metrics_text(&mut content, &report.metrics);
    content.push_str("\nSaturation is neutral for search results (no single subscriber base).\n");
    content.push_str(&format!(
        "Generated {} in {:.1}s\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.fetch_time.as_secs_f64()
    ));
    content
}

fn subscriber_text(channel: &ChannelSummary) -> String {
    if channel.hidden_subscriber_count {
        "hidden".to_string()
    } else {
        format_number(channel.subscriber_count)
    }
}

fn metrics_text(content: &mut String, metrics: &NicheMetrics) {
    content.push_str(&format!("Analyzed videos: {}\n\n", metrics.record_count));

    content.push_str("Scores\n");
    for (name, score, band) in score_rows(metrics) {
        content.push_str(&format!(
            "  {:<14} {} {:>5.1}  {}\n",
            name,
            gauge(score, GAUGE_WIDTH),
            score,
            band.label()
        ));
    }

    content.push_str("\nAverages per video\n");
    content.push_str(&format!("  Views          {}\n", format_number(metrics.avg_views.round() as u64)));
    content.push_str(&format!("  Likes          {}\n", format_number(metrics.avg_likes.round() as u64)));
    content.push_str(&format!("  Comments       {}\n", format_number(metrics.avg_comments.round() as u64)));
    content.push_str(&format!(
        "  Duration       {}\n",
        format_duration(metrics.avg_duration_seconds.round() as u64)
    ));
    content.push_str(&format!("  Engagement     {:.2}%\n", metrics.engagement_rate));
    content.push_str(&format!("  Max views      {}\n", format_number(metrics.max_views)));

    content.push_str(&format!("\nEstimated revenue (RPM ${:.2})\n", metrics.estimated_rpm));
    for tier in revenue_tiers(metrics.estimated_rpm) {
        content.push_str(&format!(
            "  per {:<12} ${:.2}\n",
            format!("{} views", format_number(tier.views)),
            tier.revenue
        ));
    }
    content.push_str(&format!("  per avg video    ${:.2}\n", metrics.estimated_revenue_per_video));

    if !metrics.top_videos.is_empty() {
        content.push_str("\nTop videos\n");
        content.push_str(&format!(
            "  {:>2}  {:>12}  {:>7}  {:>8}  {}\n",
            "#", "Views", "Eng %", "Length", "Title"
        ));
        for (rank, video) in metrics.top_videos.iter().enumerate() {
            content.push_str(&format!(
                "  {:>2}  {:>12}  {:>7.2}  {:>8}  {}\n",
                rank + 1,
                format_number(video.view_count),
                video.engagement_rate(),
                format_duration(video.duration_seconds),
                truncate(&video.title, TITLE_WIDTH)
            ));
        }
    }

    if !metrics.top_tags.is_empty() {
        content.push_str("\nTop tags\n");
        for (rank, tag) in metrics.top_tags.iter().enumerate() {
            content.push_str(&format!("  {:>2}. {} ({})\n", rank + 1, tag.tag, tag.count));
        }
    }
}

fn score_rows(metrics: &NicheMetrics) -> [(&'static str, f64, ScoreBand); 3] {
    [
        ("Market size", metrics.market_size_score, metrics.market_size_band()),
        ("Saturation", metrics.saturation_score, metrics.saturation_band()),
        ("Profitability", metrics.profitability_score, metrics.profitability_band()),
    ]
}

fn channels_text(report: &ChannelSearchReport) -> String {
    let mut content = String::new();
    content.push_str(&format!("Channels for \"{}\"\n\n", report.query));
    content.push_str(&format!(
        "  {:>2}  {:>13}  {:>15}  {:>7}  {}\n",
        "#", "Subscribers", "Views", "Videos", "Channel"
    ));

    for (rank, channel) in report.channels.iter().enumerate() {
        content.push_str(&format!(
            "  {:>2}  {:>13}  {:>15}  {:>7}  {} ({})\n",
            rank + 1,
            subscriber_text(channel),
            format_number(channel.view_count),
            format_number(channel.video_count),
            truncate(&channel.title, TITLE_WIDTH),
            channel.id
        ));
    }
    content
}

fn channel_markdown(report: &ChannelReport) -> String {
    let channel = &report.channel;
    let mut content = String::new();

    content.push_str(&format!("# {} Niche Report\n\n", channel.title));
    content.push_str("## Channel\n");
    content.push_str(&format!(
        "- **Channel**: [{}](https://www.youtube.com/channel/{})\n",
        channel.title, channel.id
    ));
    if let Some(custom_url) = &channel.custom_url {
        content.push_str(&format!("- **Handle**: {}\n", custom_url));
    }
    content.push_str(&format!("- **Subscribers**: {}\n", subscriber_text(channel)));
    content.push_str(&format!("- **Lifetime views**: {}\n", format_number(channel.view_count)));
    content.push_str(&format!("- **Videos**: {}\n\n", format_number(channel.video_count)));

    metrics_markdown(&mut content, &report.metrics);
    content.push_str(&format!(
        "\n---\n*Generated by niche-scout - {}*\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    content
}

fn niche_markdown(report: &NicheReport) -> String {
    let mut content = String::new();

    content.push_str(&format!("# \"{}\" Niche Report\n\n", report.query));
    metrics_markdown(&mut content, &report.metrics);
    content.push_str("\n> Saturation is neutral for search results.\n");
    content.push_str(&format!(
        "\n---\n*Generated by niche-scout - {}*\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    content
}

fn metrics_markdown(content: &mut String, metrics: &NicheMetrics) {
    content.push_str("## Scores\n\n");
    content.push_str("| Score | Gauge | Value | Band |\n");
    content.push_str("|---|---|---:|---|\n");
    for (name, score, band) in score_rows(metrics) {
        content.push_str(&format!(
            "| {} | `{}` | {:.1} | {} |\n",
            name,
            gauge(score, GAUGE_WIDTH),
            score,
            band.label()
        ));
    }

    content.push_str("\n## Averages\n");
    content.push_str(&format!("- **Analyzed videos**: {}\n", metrics.record_count));
    content.push_str(&format!("- **Views**: {}\n", format_number(metrics.avg_views.round() as u64)));
    content.push_str(&format!("- **Likes**: {}\n", format_number(metrics.avg_likes.round() as u64)));
    content.push_str(&format!("- **Comments**: {}\n", format_number(metrics.avg_comments.round() as u64)));
    content.push_str(&format!(
        "- **Duration**: {}\n",
        format_duration(metrics.avg_duration_seconds.round() as u64)
    ));
    content.push_str(&format!("- **Engagement**: {:.2}%\n", metrics.engagement_rate));

    content.push_str(&format!("\n## Revenue Estimate (RPM ${:.2})\n\n", metrics.estimated_rpm));
    content.push_str("| Views | Revenue |\n|---:|---:|\n");
    for tier in revenue_tiers(metrics.estimated_rpm) {
        content.push_str(&format!("| {} | ${:.2} |\n", format_number(tier.views), tier.revenue));
    }
    content.push_str(&format!(
        "| average video | ${:.2} |\n",
        metrics.estimated_revenue_per_video
    ));

    if !metrics.top_videos.is_empty() {
        content.push_str("\n## Top Videos\n\n");
        content.push_str("| # | Title | Views | Engagement | Length |\n");
        content.push_str("|---:|---|---:|---:|---:|\n");
        for (rank, video) in metrics.top_videos.iter().enumerate() {
            content.push_str(&format!(
                "| {} | [{}]({}) | {} | {:.2}% | {} |\n",
                rank + 1,
                escape_markdown(&video.title),
                video.watch_url(),
                format_number(video.view_count),
                video.engagement_rate(),
                format_duration(video.duration_seconds)
            ));
        }
    }

    if !metrics.top_tags.is_empty() {
        content.push_str("\n## Top Tags\n\n");
        content.push_str("| # | Tag | Videos |\n|---:|---|---:|\n");
        for (rank, tag) in metrics.top_tags.iter().enumerate() {
            content.push_str(&format!("| {} | {} | {} |\n", rank + 1, escape_markdown(&tag.tag), tag.count));
        }
    }
}

fn channels_markdown(report: &ChannelSearchReport) -> String {
    let mut content = String::new();
    content.push_str(&format!("# Channels for \"{}\"\n\n", report.query));
    content.push_str("| # | Channel | Subscribers | Views | Videos |\n");
    content.push_str("|---:|---|---:|---:|---:|\n");

    for (rank, channel) in report.channels.iter().enumerate() {
        content.push_str(&format!(
            "| {} | [{}](https://www.youtube.com/channel/{}) | {} | {} | {} |\n",
            rank + 1,
            escape_markdown(&channel.title),
            channel.id,
            subscriber_text(channel),
            format_number(channel.view_count),
            format_number(channel.video_count)
        ));
    }
    content
}

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|").replace('[', "\\[").replace(']', "\\]")
}
