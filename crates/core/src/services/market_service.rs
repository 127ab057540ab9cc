use std::sync::Arc;
use std::time::Duration;

use super::timer::{default_timer, Timer};
use super::{with_timeout, DEFAULT_REQUEST_TIMEOUT};
use crate::api::traits::TrendSource;
use crate::models::trend::{MarketTrend, PopularProduct, Tier, TrendTimeframe};

/// Shown when the trend source fails.
pub const TRENDS_FAILED: &str = "Failed to load market trends";

/// State of the Market Trends panel.
///
/// Starts in the loading state; every timeframe change reloads from the
/// [`TrendSource`].
#[derive(Debug)]
pub struct MarketTrendsPanel {
    timeframe: TrendTimeframe,
    trends: Vec<MarketTrend>,
    popular_products: Vec<PopularProduct>,
    loading: bool,
    error: Option<String>,
    timeout: Duration,
    timer: Option<Arc<dyn Timer>>,
}

impl Default for MarketTrendsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketTrendsPanel {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeframe: TrendTimeframe::default(),
            trends: Vec::new(),
            popular_products: Vec::new(),
            loading: true,
            error: None,
            timeout,
            timer: default_timer(),
        }
    }

    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Fetch data for the current timeframe.
    pub async fn load(&mut self, source: &dyn TrendSource) {
        self.loading = true;
        self.error = None;

        let result = with_timeout(
            self.timer.as_deref(),
            source.name(),
            self.timeout,
            source.fetch(self.timeframe),
        )
        .await;
        match result {
            Ok(snapshot) => {
                self.trends = snapshot.trends;
                self.popular_products = snapshot.popular_products;
            }
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "failed to load market trends");
                self.error = Some(TRENDS_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    /// Switch timeframe and reload. Selecting the current timeframe is a no-op.
    pub async fn select_timeframe(&mut self, source: &dyn TrendSource, timeframe: TrendTimeframe) -> bool {
        if timeframe == self.timeframe {
            return false;
        }
        self.timeframe = timeframe;
        self.load(source).await;
        true
    }

    #[must_use]
    pub fn timeframe(&self) -> TrendTimeframe {
        self.timeframe
    }

    #[must_use]
    pub fn trends(&self) -> &[MarketTrend] {
        &self.trends
    }

    #[must_use]
    pub fn popular_products(&self) -> &[PopularProduct] {
        &self.popular_products
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Popular products paired with their score and sentiment tiers.
    pub fn rated_products(&self) -> Vec<(&PopularProduct, Tier, Tier)> {
        self.popular_products
            .iter()
            .map(|p| (p, Tier::from_score(p.trend_score), Tier::from_sentiment(p.twitter_sentiment)))
            .collect()
    }
}
