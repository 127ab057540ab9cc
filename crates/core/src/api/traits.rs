use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::forecast::{ForecastRequest, ForecastResponse};
use crate::models::product::{NewProduct, ProductCreated};
use crate::models::sku::Sku;
use crate::models::trend::{MarketTrend, PopularProduct, TrendPoint, TrendTimeframe};

/// The forecasting service the dashboard talks to.
///
/// [`HttpForecastApi`](super::http::HttpForecastApi) is the production
/// implementation; panels only ever see this trait, so tests swap in
/// scripted implementations.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ForecastApi: Send + Sync {
    /// `GET /skus`
    async fn list_skus(&self) -> Result<Vec<Sku>, CoreError>;

    /// `GET /trends`
    async fn list_trends(&self) -> Result<Vec<TrendPoint>, CoreError>;

    /// `POST /predict`
    async fn predict(&self, request: &ForecastRequest) -> Result<ForecastResponse, CoreError>;

    /// `POST /add-product`
    async fn add_product(&self, product: &NewProduct) -> Result<ProductCreated, CoreError>;

    /// `GET /health`. Returns the reported status string.
    async fn health(&self) -> Result<String, CoreError>;
}

/// Everything the Market Trends panel shows for one timeframe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    pub trends: Vec<MarketTrend>,
    pub popular_products: Vec<PopularProduct>,
}

/// Source of market-trend data for the Market Trends panel.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TrendSource: Send + Sync {
    /// Human-readable name of this source (for logs).
    fn name(&self) -> &str;

    async fn fetch(&self, timeframe: TrendTimeframe) -> Result<MarketSnapshot, CoreError>;
}
