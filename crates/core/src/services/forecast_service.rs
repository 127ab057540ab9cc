use std::sync::Arc;
use std::time::Duration;

use super::presentation_service::{
    kpi_cards, trend_chart, DayNavigator, ForecastSummary, KpiCard, PriceChange, PromoImpact,
    TrendChartPoint,
};
use super::timer::{default_timer, Timer};
use super::{with_timeout, DEFAULT_REQUEST_TIMEOUT};
use crate::api::traits::ForecastApi;
use crate::errors::CoreError;
use crate::models::forecast::{ForecastPoint, ForecastRequest, ForecastResponse, Kpis};
use crate::models::sku::Sku;
use crate::models::trend::TrendPoint;

/// Panel-local message shown when the SKU list cannot be loaded.
pub const SKUS_FAILED: &str = "Failed to load SKUs";

/// Panel-local message shown when a forecast request fails.
pub const FORECAST_FAILED: &str = "Failed to load forecast";

/// A forecast request the panel has issued and is waiting on.
///
/// Only the ticket with the highest id may update the panel; anything
/// older resolving later is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTicket {
    pub id: u64,
    pub request: ForecastRequest,
}

/// What happened to a forecast result handed back to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Latest request succeeded; forecast and KPIs replaced.
    Applied,
    /// Latest request failed; the panel shows an error.
    Failed,
    /// Superseded by a newer request, or the panel was unmounted. Ignored.
    Stale,
}

/// State of the dashboard panel: SKU picker, promo simulator, forecast and KPIs.
///
/// Parameter changes (`select_sku`, `set_price`, `set_promo`) return a
/// [`ForecastTicket`] whenever a new forecast is needed. The caller runs
/// the request (directly through [`ForecastPanel::run`] or on its own task)
/// and hands the result to [`ForecastPanel::apply_forecast`].
#[derive(Debug)]
pub struct ForecastPanel {
    skus: Vec<Sku>,
    trends: Vec<TrendPoint>,
    selected: Option<usize>,
    price: f64,
    promo_active: bool,
    forecast: Option<Vec<ForecastPoint>>,
    kpis: Option<Kpis>,
    error: Option<String>,
    navigator: DayNavigator,
    /// Id handed to the most recently issued ticket (0 = none yet).
    last_issued: u64,
    /// Latest ticket that has not resolved yet.
    pending: Option<u64>,
    mounted: bool,
    timeout: Duration,
    timer: Option<Arc<dyn Timer>>,
}

impl Default for ForecastPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastPanel {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            skus: Vec::new(),
            trends: Vec::new(),
            selected: None,
            price: 0.0,
            promo_active: false,
            forecast: None,
            kpis: None,
            error: None,
            navigator: DayNavigator::default(),
            last_issued: 0,
            pending: None,
            mounted: true,
            timeout,
            timer: default_timer(),
        }
    }

    /// Measure request timeouts on `timer` instead of the default one.
    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Load SKUs and trends concurrently, select the first SKU and fetch
    /// its forecast. Returns the outcome of that first forecast, if any.
    pub async fn mount(&mut self, api: &dyn ForecastApi) -> Option<ApplyOutcome> {
        let timer = self.timer.as_deref();
        let (skus, trends) = futures::join!(
            with_timeout(timer, "/skus", self.timeout, api.list_skus()),
            with_timeout(timer, "/trends", self.timeout, api.list_trends()),
        );

        self.apply_trends(trends);
        let ticket = self.apply_skus(skus)?;
        Some(self.run(api, ticket).await)
    }

    /// Detach the panel. Every outstanding ticket becomes stale.
    pub fn unmount(&mut self) {
        if let Some(id) = self.pending.take() {
            tracing::debug!(request_id = id, "panel unmounted with a forecast in flight");
        }
        self.mounted = false;
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Store a SKU list result. On success the first SKU becomes selected
    /// with its base price, which yields the ticket for its forecast.
    pub fn apply_skus(&mut self, result: Result<Vec<Sku>, CoreError>) -> Option<ForecastTicket> {
        if !self.mounted {
            return None;
        }
        match result {
            Ok(skus) => {
                tracing::debug!(count = skus.len(), "SKU list loaded");
                self.skus = skus;
                self.selected = None;
                let first = self.skus.first()?;
                self.price = first.base_price;
                self.selected = Some(0);
                self.issue()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load SKUs");
                self.error = Some(SKUS_FAILED.to_string());
                None
            }
        }
    }

    /// Store a trend list result. Failures only get logged.
    pub fn apply_trends(&mut self, result: Result<Vec<TrendPoint>, CoreError>) {
        if !self.mounted {
            return;
        }
        match result {
            Ok(trends) => self.trends = trends,
            Err(e) => tracing::warn!(error = %e, "failed to load trends"),
        }
    }

    // ── Parameters ──────────────────────────────────────────────────

    /// Select a SKU by id and reset the price to its base price.
    pub fn select_sku(&mut self, sku_id: &str) -> Result<Option<ForecastTicket>, CoreError> {
        let idx = self
            .skus
            .iter()
            .position(|s| s.id == sku_id)
            .ok_or_else(|| CoreError::SkuNotFound(sku_id.to_string()))?;

        let base_price = self.skus[idx].base_price;
        if self.selected == Some(idx) && self.price == base_price {
            return Ok(None);
        }
        self.selected = Some(idx);
        self.price = base_price;
        Ok(self.issue())
    }

    /// Override the price. Negative or non-finite values are ignored.
    pub fn set_price(&mut self, price: f64) -> Option<ForecastTicket> {
        if !price.is_finite() || price < 0.0 || price == self.price {
            return None;
        }
        self.price = price;
        self.issue()
    }

    pub fn set_promo(&mut self, promo_active: bool) -> Option<ForecastTicket> {
        if promo_active == self.promo_active {
            return None;
        }
        self.promo_active = promo_active;
        self.issue()
    }

    pub fn toggle_promo(&mut self) -> Option<ForecastTicket> {
        self.set_promo(!self.promo_active)
    }

    // ── Forecast requests ───────────────────────────────────────────

    /// Send `ticket` and apply the response (bounded by the panel timeout).
    pub async fn run(&mut self, api: &dyn ForecastApi, ticket: ForecastTicket) -> ApplyOutcome {
        let result = with_timeout(
            self.timer.as_deref(),
            "/predict",
            self.timeout,
            api.predict(&ticket.request),
        )
        .await;
        self.apply_forecast(ticket.id, result)
    }

    /// Apply the result of the request identified by `request_id`.
    ///
    /// Results for anything but the latest issued request are rejected.
    pub fn apply_forecast(
        &mut self,
        request_id: u64,
        result: Result<ForecastResponse, CoreError>,
    ) -> ApplyOutcome {
        if !self.mounted || self.pending != Some(request_id) {
            tracing::debug!(
                request_id,
                latest = self.last_issued,
                mounted = self.mounted,
                "discarding stale forecast response"
            );
            return ApplyOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(resp) => {
                tracing::debug!(request_id, days = resp.forecast.len(), "forecast applied");
                self.navigator.set_len(resp.forecast.len());
                self.forecast = Some(resp.forecast);
                self.kpis = Some(resp.kpis);
                ApplyOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(request_id, error = %e, "forecast request failed");
                self.error = Some(FORECAST_FAILED.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    fn issue(&mut self) -> Option<ForecastTicket> {
        if !self.mounted {
            return None;
        }
        let sku = self.selected_sku()?;
        let request = ForecastRequest {
            sku_id: sku.id.clone(),
            price: self.price,
            promo_active: self.promo_active,
        };
        self.last_issued += 1;
        self.pending = Some(self.last_issued);
        self.error = None;
        tracing::debug!(
            request_id = self.last_issued,
            sku_id = %request.sku_id,
            price = request.price,
            promo_active = request.promo_active,
            "forecast requested"
        );
        Some(ForecastTicket {
            id: self.last_issued,
            request,
        })
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn skus(&self) -> &[Sku] {
        &self.skus
    }

    #[must_use]
    pub fn trends(&self) -> &[TrendPoint] {
        &self.trends
    }

    #[must_use]
    pub fn selected_sku(&self) -> Option<&Sku> {
        self.selected.and_then(|i| self.skus.get(i))
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub fn promo_active(&self) -> bool {
        self.promo_active
    }

    #[must_use]
    pub fn forecast(&self) -> Option<&[ForecastPoint]> {
        self.forecast.as_deref()
    }

    #[must_use]
    pub fn kpis(&self) -> Option<&Kpis> {
        self.kpis.as_ref()
    }

    /// `true` while the latest forecast request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Id of the most recently issued forecast request.
    #[must_use]
    pub fn last_request_id(&self) -> u64 {
        self.last_issued
    }

    #[must_use]
    pub fn navigator(&self) -> &DayNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut DayNavigator {
        &mut self.navigator
    }

    // ── Derived views ───────────────────────────────────────────────

    pub fn summary(&self) -> Option<ForecastSummary> {
        ForecastSummary::from_points(self.forecast()?)
    }

    pub fn kpi_cards(&self) -> [KpiCard; 4] {
        kpi_cards(self.kpis())
    }

    pub fn trend_chart(&self) -> Vec<TrendChartPoint> {
        trend_chart(&self.trends)
    }

    pub fn price_change(&self) -> Option<PriceChange> {
        PriceChange::compute(self.price, self.selected_sku()?.base_price)
    }

    pub fn promo_impact(&self) -> PromoImpact {
        PromoImpact::for_flag(self.promo_active)
    }
}
