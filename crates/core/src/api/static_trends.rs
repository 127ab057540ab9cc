use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::traits::{MarketSnapshot, TrendSource};
use crate::errors::CoreError;
use crate::services::timer::{default_timer, Timer};
use crate::models::trend::{MarketTrend, PopularProduct, TrendTimeframe};

/// Built-in market-trend data with a configurable artificial latency.
///
/// There is no live trend feed behind the Market Trends panel; this source
/// serves a fixed snapshot for every timeframe. The latency emulates a
/// network round trip and is zero by default so tests stay deterministic.
/// It is skipped on targets without a [`Timer`].
#[derive(Debug)]
pub struct StaticTrendSource {
    latency: Duration,
    timer: Option<Arc<dyn Timer>>,
}

impl StaticTrendSource {
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            timer: default_timer(),
        }
    }

    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for StaticTrendSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TrendSource for StaticTrendSource {
    fn name(&self) -> &str {
        "Static"
    }

    async fn fetch(&self, timeframe: TrendTimeframe) -> Result<MarketSnapshot, CoreError> {
        match &self.timer {
            Some(timer) if !self.latency.is_zero() => timer.sleep(self.latency).await,
            _ => {}
        }
        tracing::debug!(%timeframe, "serving static market trends");
        Ok(MarketSnapshot {
            trends: market_trends(),
            popular_products: popular_products(),
        })
    }
}

fn trend(name: &str, google_trend: u32, twitter_mentions: u32, sentiment: f64, category: &str) -> MarketTrend {
    MarketTrend {
        name: name.into(),
        google_trend,
        twitter_mentions,
        sentiment,
        category: category.into(),
    }
}

fn market_trends() -> Vec<MarketTrend> {
    vec![
        trend("Organic Food", 85, 1200, 0.8, "Produce"),
        trend("Plant-Based Meat", 92, 2100, 0.7, "Meat"),
        trend("Greek Yogurt", 78, 890, 0.9, "Dairy"),
        trend("Avocado", 95, 3400, 0.6, "Produce"),
        trend("Salmon", 82, 1100, 0.8, "Seafood"),
        trend("Almond Milk", 88, 1600, 0.7, "Beverages"),
        trend("Quinoa", 75, 650, 0.8, "Pantry"),
        trend("Chia Seeds", 70, 450, 0.9, "Pantry"),
    ]
}

fn popular_products() -> Vec<PopularProduct> {
    let product = |name: &str,
                   trend_score: u32,
                   google_trend: u32,
                   twitter_sentiment: f64,
                   category: &str,
                   price_range: &str,
                   demand_prediction: &str,
                   reason: &str| PopularProduct {
        name: name.into(),
        trend_score,
        google_trend,
        twitter_sentiment,
        category: category.into(),
        price_range: price_range.into(),
        demand_prediction: demand_prediction.into(),
        reason: reason.into(),
    };

    vec![
        product(
            "Organic Bananas",
            95,
            92,
            0.8,
            "Produce",
            "$2.99 - $4.99",
            "High",
            "High social media mentions and positive sentiment",
        ),
        product(
            "Plant-Based Ground Beef",
            88,
            89,
            0.7,
            "Meat",
            "$8.99 - $12.99",
            "Medium-High",
            "Growing consumer interest in plant-based alternatives",
        ),
        product(
            "Greek Yogurt",
            82,
            78,
            0.9,
            "Dairy",
            "$4.99 - $6.99",
            "High",
            "Consistent positive sentiment and steady search volume",
        ),
        product(
            "Fresh Avocados",
            90,
            95,
            0.6,
            "Produce",
            "$1.99 - $3.99",
            "Very High",
            "Viral social media trends and high search volume",
        ),
    ]
}
