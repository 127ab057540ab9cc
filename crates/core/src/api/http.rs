use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::traits::ForecastApi;
use crate::errors::CoreError;
use crate::models::forecast::{ForecastRequest, ForecastResponse};
use crate::models::product::{NewProduct, ProductCreated};
use crate::models::settings::{Settings, DEFAULT_API_BASE_URL};
use crate::models::sku::{Sku, SkuList};
use crate::models::trend::{TrendList, TrendPoint};
use crate::services::DEFAULT_REQUEST_TIMEOUT;

/// HTTP client for the forecasting service.
///
/// - **Endpoints**: `/skus`, `/trends`, `/predict`, `/add-product`, `/health`
/// - **Errors**: non-2xx responses with a JSON `error` field become
///   [`CoreError::Api`] carrying that message verbatim.
/// - **Timeout**: every request is bounded by the client timeout (native only).
pub struct HttpForecastApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpForecastApi {
    pub fn new() -> Result<Self, CoreError> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CoreError> {
        Self::build(base_url.into(), DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        Self::build(settings.base_url().to_string(), settings.request_timeout())
    }

    fn build(base_url: String, timeout: Duration) -> Result<Self, CoreError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(timeout);
        let client = builder
            .build()
            .map_err(|e| CoreError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upper bound the client applies to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

// ── Service response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct HealthBody {
    status: String,
}

/// Turn a response into `T`, or into the service's own error message.
async fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T, CoreError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        tracing::warn!(endpoint, %status, %message, "forecast service returned an error");
        return Err(CoreError::Api {
            endpoint: endpoint.to_string(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| CoreError::Api {
        endpoint: endpoint.to_string(),
        message: format!("Failed to parse response: {e}"),
    })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ForecastApi for HttpForecastApi {
    async fn list_skus(&self) -> Result<Vec<Sku>, CoreError> {
        let resp = self.client.get(self.url("/skus")).send().await?;
        let list: SkuList = decode("/skus", resp).await?;
        tracing::debug!(count = list.skus.len(), "loaded SKUs");
        Ok(list.skus)
    }

    async fn list_trends(&self) -> Result<Vec<TrendPoint>, CoreError> {
        let resp = self.client.get(self.url("/trends")).send().await?;
        let list: TrendList = decode("/trends", resp).await?;
        tracing::debug!(count = list.trends.len(), "loaded trends");
        Ok(list.trends)
    }

    async fn predict(&self, request: &ForecastRequest) -> Result<ForecastResponse, CoreError> {
        let resp = self
            .client
            .post(self.url("/predict"))
            .json(request)
            .send()
            .await?;
        decode("/predict", resp).await
    }

    async fn add_product(&self, product: &NewProduct) -> Result<ProductCreated, CoreError> {
        let resp = self
            .client
            .post(self.url("/add-product"))
            .json(product)
            .send()
            .await?;
        decode("/add-product", resp).await
    }

    async fn health(&self) -> Result<String, CoreError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        let body: HealthBody = decode("/health", resp).await?;
        Ok(body.status)
    }
}
