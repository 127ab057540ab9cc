use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of sentiment / search interest, as served by `GET /trends`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,

    /// Aggregate sentiment on a 0–1 scale
    pub sentiment: f64,

    /// Relative search volume (0–100)
    pub search_volume: f64,
}

/// Envelope of `GET /trends`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendList {
    pub trends: Vec<TrendPoint>,
}

/// A market-wide topic shown on the Market Trends panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub name: String,
    /// Google Trends interest score (0–100)
    pub google_trend: u32,
    pub twitter_mentions: u32,
    /// Social sentiment on a 0–1 scale
    pub sentiment: f64,
    pub category: String,
}

/// A product highlighted as trending, with a qualitative demand call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularProduct {
    pub name: String,
    pub trend_score: u32,
    pub google_trend: u32,
    pub twitter_sentiment: f64,
    pub category: String,
    pub price_range: String,
    pub demand_prediction: String,
    pub reason: String,
}

/// Look-back window selected on the Market Trends panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendTimeframe {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TrendTimeframe {
    pub const ALL: [TrendTimeframe; 3] = [Self::Week, Self::Month, Self::Quarter];

    pub fn days(self) -> u32 {
        match self {
            TrendTimeframe::Week => 7,
            TrendTimeframe::Month => 30,
            TrendTimeframe::Quarter => 90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendTimeframe::Week => "Last 7 days",
            TrendTimeframe::Month => "Last 30 days",
            TrendTimeframe::Quarter => "Last 90 days",
        }
    }
}

impl std::fmt::Display for TrendTimeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendTimeframe::Week => write!(f, "7d"),
            TrendTimeframe::Month => write!(f, "30d"),
            TrendTimeframe::Quarter => write!(f, "90d"),
        }
    }
}

/// Three-step rating used to color scores and sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    /// Trend score tier: 80+ high, 60+ medium, otherwise low.
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Tier::High
        } else if score >= 60 {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    /// Sentiment tier: 0.7+ high, 0.5+ medium, otherwise low.
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment >= 0.7 {
            Tier::High
        } else if sentiment >= 0.5 {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}
