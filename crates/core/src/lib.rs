pub mod api;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use api::http::HttpForecastApi;
use api::static_trends::StaticTrendSource;
use api::traits::{ForecastApi, TrendSource};
use models::{
    product::ProductCreated,
    section::{Section, View},
    settings::Settings,
    trend::TrendTimeframe,
    user::User,
};
use services::{
    forecast_service::{ApplyOutcome, ForecastPanel},
    market_service::MarketTrendsPanel,
    navigation_service::SectionRouter,
    product_service::ProductForm,
    session_service::SessionGate,
};
use storage::local::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
use storage::local::FileStore;
use storage::session::{LocalSessionStore, SessionStore};

use errors::CoreError;

/// What the dashboard should currently render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Shell { section: Section, view: View },
}

/// The panel mounted for the active section.
#[derive(Debug)]
pub enum Panel {
    Dashboard(ForecastPanel),
    AddProduct(ProductForm),
    MarketTrends(MarketTrendsPanel),
}

/// Main entry point for the supply-forecast core library.
/// Owns the session, the router and the mounted panel, and wires them to
/// the forecasting service.
#[must_use]
pub struct SupplyChainDashboard {
    settings: Settings,
    api: Arc<dyn ForecastApi>,
    trend_source: Arc<dyn TrendSource>,
    session: SessionGate,
    router: SectionRouter,
    panel: Option<Panel>,
}

impl std::fmt::Debug for SupplyChainDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupplyChainDashboard")
            .field("api_base_url", &self.settings.api_base_url)
            .field("user", &self.session.user())
            .field("section", &self.router.active())
            .field("panel_mounted", &self.panel.is_some())
            .finish()
    }
}

impl SupplyChainDashboard {
    /// Assemble a dashboard from explicit collaborators.
    pub fn new(
        settings: Settings,
        api: Arc<dyn ForecastApi>,
        trend_source: Arc<dyn TrendSource>,
        session_store: Box<dyn SessionStore>,
    ) -> Self {
        Self {
            settings,
            api,
            trend_source,
            session: SessionGate::new(session_store),
            router: SectionRouter::new(),
            panel: None,
        }
    }

    /// Production wiring: HTTP client, static trends with the configured
    /// latency, and a file-backed session when `storage_path` is set.
    pub fn from_settings(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let api = Arc::new(HttpForecastApi::from_settings(&settings)?);
        let trends = Arc::new(StaticTrendSource::with_latency(settings.trends_latency()));
        let store = session_store_for(&settings);
        Ok(Self::new(settings, api, trends, store))
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Restore the stored session and mount the default panel if signed in.
    pub async fn start(&mut self) -> Screen {
        if self.session.start() {
            self.remount().await;
        }
        self.screen()
    }

    /// Sign in `user`, persist the record and open the shell.
    pub async fn login(&mut self, user: User) -> Result<Screen, CoreError> {
        self.session.login(user)?;
        self.remount().await;
        Ok(self.screen())
    }

    /// Adopt a session written to storage by an external login flow.
    pub async fn complete_login(&mut self) -> Screen {
        if self.session.complete_login() && self.panel.is_none() {
            self.remount().await;
        }
        self.screen()
    }

    /// Clear the stored session, unmount the panel and reset to the dashboard.
    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.unmount();
        self.router.reset();
        self.session.logout()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Switch sections. The target panel is remounted from scratch.
    /// Returns `false` when signed out or already on `section`.
    pub async fn navigate(&mut self, section: Section) -> bool {
        if !self.session.is_authenticated() || !self.router.navigate(section) {
            return false;
        }
        self.remount().await;
        true
    }

    pub fn screen(&self) -> Screen {
        if !self.session.is_authenticated() {
            return Screen::Login;
        }
        Screen::Shell {
            section: self.router.active(),
            view: self.router.view(),
        }
    }

    #[must_use]
    pub fn active_section(&self) -> Section {
        self.router.active()
    }

    #[must_use]
    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    #[must_use]
    pub fn forecast_panel(&self) -> Option<&ForecastPanel> {
        match &self.panel {
            Some(Panel::Dashboard(p)) => Some(p),
            _ => None,
        }
    }

    pub fn forecast_panel_mut(&mut self) -> Option<&mut ForecastPanel> {
        match &mut self.panel {
            Some(Panel::Dashboard(p)) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn product_form(&self) -> Option<&ProductForm> {
        match &self.panel {
            Some(Panel::AddProduct(p)) => Some(p),
            _ => None,
        }
    }

    pub fn product_form_mut(&mut self) -> Option<&mut ProductForm> {
        match &mut self.panel {
            Some(Panel::AddProduct(p)) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn market_panel(&self) -> Option<&MarketTrendsPanel> {
        match &self.panel {
            Some(Panel::MarketTrends(p)) => Some(p),
            _ => None,
        }
    }

    // ── Dashboard actions ───────────────────────────────────────────

    /// Select a SKU on the dashboard and refresh its forecast.
    /// `Ok(None)` means nothing changed and no request was sent.
    pub async fn select_sku(&mut self, sku_id: &str) -> Result<Option<ApplyOutcome>, CoreError> {
        let api = Arc::clone(&self.api);
        let panel = self.require_forecast_panel()?;
        match panel.select_sku(sku_id)? {
            Some(ticket) => Ok(Some(panel.run(api.as_ref(), ticket).await)),
            None => Ok(None),
        }
    }

    /// Override the simulated price and refresh the forecast.
    pub async fn set_price(&mut self, price: f64) -> Result<Option<ApplyOutcome>, CoreError> {
        let api = Arc::clone(&self.api);
        let panel = self.require_forecast_panel()?;
        match panel.set_price(price) {
            Some(ticket) => Ok(Some(panel.run(api.as_ref(), ticket).await)),
            None => Ok(None),
        }
    }

    /// Switch the promotion flag and refresh the forecast.
    pub async fn set_promo(&mut self, promo_active: bool) -> Result<Option<ApplyOutcome>, CoreError> {
        let api = Arc::clone(&self.api);
        let panel = self.require_forecast_panel()?;
        match panel.set_promo(promo_active) {
            Some(ticket) => Ok(Some(panel.run(api.as_ref(), ticket).await)),
            None => Ok(None),
        }
    }

    // ── Product / trends actions ────────────────────────────────────

    /// Submit the product form.
    pub async fn submit_product(&mut self) -> Result<ProductCreated, CoreError> {
        let api = Arc::clone(&self.api);
        match &mut self.panel {
            Some(Panel::AddProduct(form)) => form.submit(api.as_ref()).await,
            _ => Err(CoreError::ValidationError(
                "The product form is not open".into(),
            )),
        }
    }

    /// Change the Market Trends timeframe and reload.
    pub async fn select_trend_timeframe(&mut self, timeframe: TrendTimeframe) -> Result<bool, CoreError> {
        let source = Arc::clone(&self.trend_source);
        match &mut self.panel {
            Some(Panel::MarketTrends(p)) => Ok(p.select_timeframe(source.as_ref(), timeframe).await),
            _ => Err(CoreError::ValidationError(
                "The market trends panel is not open".into(),
            )),
        }
    }

    /// Ask the service whether it is up.
    pub async fn health(&self) -> Result<String, CoreError> {
        self.api.health().await
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Internal ────────────────────────────────────────────────────

    fn require_forecast_panel(&mut self) -> Result<&mut ForecastPanel, CoreError> {
        self.forecast_panel_mut().ok_or_else(|| {
            CoreError::ValidationError("The forecast dashboard is not open".into())
        })
    }

    fn unmount(&mut self) {
        if let Some(Panel::Dashboard(p)) = &mut self.panel {
            p.unmount();
        }
        self.panel = None;
    }

    /// Replace the mounted panel with a fresh one for the active section.
    async fn remount(&mut self) {
        self.unmount();
        let timeout = self.settings.request_timeout();

        let panel = match self.router.view() {
            View::Dashboard => {
                let mut panel = ForecastPanel::with_timeout(timeout);
                panel.mount(self.api.as_ref()).await;
                Panel::Dashboard(panel)
            }
            View::AddProduct => {
                Panel::AddProduct(ProductForm::with_timings(self.settings.form_reset_delay(), timeout))
            }
            View::MarketTrends => {
                let mut panel = MarketTrendsPanel::with_timeout(timeout);
                panel.load(self.trend_source.as_ref()).await;
                Panel::MarketTrends(panel)
            }
        };
        tracing::debug!(section = %self.router.active(), mount_key = self.router.mount_key(), "panel mounted");
        self.panel = Some(panel);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn session_store_for(settings: &Settings) -> Box<dyn SessionStore> {
    match &settings.storage_path {
        Some(path) => Box::new(LocalSessionStore::new(FileStore::new(path))),
        None => Box::new(LocalSessionStore::new(MemoryStore::new())),
    }
}

#[cfg(target_arch = "wasm32")]
fn session_store_for(_settings: &Settings) -> Box<dyn SessionStore> {
    Box::new(LocalSessionStore::new(MemoryStore::new()))
}
