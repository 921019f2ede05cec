//! Composite score arithmetic. Every function is total over non-negative
//! inputs and never returns NaN.

use crate::config::{MarketSizeCurve, ScoringConfig};
use serde::{Deserialize, Serialize};

/// Subscriber-free saturation score
pub const NEUTRAL_SATURATION: f64 = 50.0;

/// Display band of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    /// 0-49
    Low,
    /// 50-70
    Moderate,
    /// 71-100
    High,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score < 50.0 {
            ScoreBand::Low
        } else if score <= 70.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Low => "low",
            ScoreBand::Moderate => "moderate",
            ScoreBand::High => "high",
        }
    }
}

/// Clamp to `[0, 100]`, mapping NaN to 0
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// `(avg_likes + avg_comments) / avg_views * 100`, or 0 without views
pub fn engagement_rate(avg_likes: f64, avg_comments: f64, avg_views: f64) -> f64 {
    if !(avg_views > 0.0) {
        return 0.0;
    }

    let rate = (avg_likes + avg_comments) / avg_views * 100.0;
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        0.0
    }
}

/// Market size from the single largest view count.
///
/// `reference_view_count` maps to 100 on both curves.
pub fn market_size_score(max_views: u64, scoring: &ScoringConfig) -> f64 {
    let reference = scoring.reference_view_count.max(1) as f64;
    let views = max_views as f64;

    let raw = match scoring.market_size_curve {
        MarketSizeCurve::Linear => views / reference * 100.0,
        MarketSizeCurve::Logarithmic => (1.0 + views).log10() / (1.0 + reference).log10() * 100.0,
    };

    clamp_score(raw)
}

/// Average views divided by subscribers; `None` when subscribers are unknown or zero
pub fn reach_ratio(avg_views: f64, subscribers: Option<u64>) -> Option<f64> {
    match subscribers {
        Some(subs) if subs > 0 => Some(avg_views / subs as f64).filter(|r| r.is_finite()),
        _ => None,
    }
}

/// `100 - reach_ratio * 100`, or the neutral 50 without a reach ratio
pub fn saturation_score(reach_ratio: Option<f64>) -> f64 {
    match reach_ratio {
        Some(ratio) => clamp_score(100.0 - ratio * 100.0),
        None => NEUTRAL_SATURATION,
    }
}

/// Revenue per thousand views, scaled by the engagement multiplier
pub fn estimated_rpm(engagement_rate: f64, scoring: &ScoringConfig) -> f64 {
    let multiplier = if engagement_rate >= scoring.high_engagement_threshold {
        scoring.rpm_engagement_multiplier_high
    } else {
        scoring.rpm_engagement_multiplier_low
    };

    let rpm = scoring.base_rpm * multiplier;
    if rpm.is_finite() {
        rpm.max(0.0)
    } else {
        0.0
    }
}

/// Estimated revenue of an average item
pub fn revenue_per_item(avg_views: f64, rpm: f64) -> f64 {
    let revenue = rpm * avg_views / 1000.0;
    if revenue.is_finite() {
        revenue.max(0.0)
    } else {
        0.0
    }
}

/// Average-item revenue relative to `reference_revenue`
pub fn profitability_score(revenue_per_item: f64, scoring: &ScoringConfig) -> f64 {
    if !(scoring.reference_revenue > 0.0) {
        return 0.0;
    }
    clamp_score(revenue_per_item / scoring.reference_revenue * 100.0)
}
