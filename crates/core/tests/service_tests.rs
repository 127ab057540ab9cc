// ═══════════════════════════════════════════════════════════════════
// Service Tests: session gate, router, forecast panel, product form,
// market trends panel, presentation helpers
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use supply_forecast_core::api::traits::{ForecastApi, MarketSnapshot, TrendSource};
use supply_forecast_core::errors::CoreError;
use supply_forecast_core::models::forecast::{ForecastPoint, ForecastRequest, ForecastResponse, Kpis};
use supply_forecast_core::models::product::{NewProduct, ProductCreated, ProductDraft, ProductField};
use supply_forecast_core::models::section::{Section, View};
use supply_forecast_core::models::sku::Sku;
use supply_forecast_core::models::trend::{Tier, TrendPoint, TrendTimeframe};
use supply_forecast_core::models::user::User;
use supply_forecast_core::services::forecast_service::{
    ApplyOutcome, ForecastPanel, FORECAST_FAILED, SKUS_FAILED,
};
use supply_forecast_core::services::market_service::{MarketTrendsPanel, TRENDS_FAILED};
use supply_forecast_core::services::navigation_service::SectionRouter;
use supply_forecast_core::services::presentation_service::{
    day_detail, demand_bar_pct, kpi_cards, DayNavigator, DemandLevel, ForecastSummary,
    PriceChange, PriceDirection, PromoImpact,
};
use supply_forecast_core::services::product_service::{
    format_sku_id, prepare_product, ProductForm, SubmitStatus, MISSING_FIELDS, SUBMIT_FAILED,
};
use supply_forecast_core::services::session_service::SessionGate;
use supply_forecast_core::storage::local::{KeyValueStore, MemoryStore};
use supply_forecast_core::storage::session::{LocalSessionStore, SessionStore, USER_KEY};

// ═══════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════

const BASE_DEMAND: [u32; 7] = [100, 120, 90, 110, 130, 140, 105];

fn catalog() -> Vec<Sku> {
    vec![
        Sku::new("SKU001", "Organic Bananas", "Produce", 2.99),
        Sku::new("SKU002", "Premium Ground Beef", "Meat", 8.99),
        Sku::new("SKU003", "Whole Milk 1L", "Dairy", 3.49),
    ]
}

fn points(demand: &[u32]) -> Vec<ForecastPoint> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    demand
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let date = start + chrono::Duration::days(i as i64);
            ForecastPoint {
                date,
                demand: d,
                confidence_lower: d * 85 / 100,
                confidence_upper: d * 115 / 100,
                day_of_week: date.format("%A").to_string(),
            }
        })
        .collect()
}

fn response(demand: &[u32], uplift: f64) -> ForecastResponse {
    let total: u32 = demand.iter().sum();
    ForecastResponse {
        sku: None,
        forecast: points(demand),
        kpis: Kpis {
            mape: 12.34,
            fill_rate: 94.56,
            uplift,
            avg_demand: f64::from(total) / demand.len() as f64,
            total_forecast: Some(u64::from(total)),
        },
    }
}

/// Scripted forecasting service. Promo adds 50 units to every day.
#[derive(Default)]
struct MockApi {
    fail_skus: bool,
    fail_trends: bool,
    fail_predict: bool,
    add_error: Option<String>,
    predict_delay: Duration,
    predictions: Mutex<Vec<ForecastRequest>>,
    products: Mutex<Vec<NewProduct>>,
}

impl MockApi {
    fn predictions(&self) -> Vec<ForecastRequest> {
        self.predictions.lock().unwrap().clone()
    }

    fn products(&self) -> Vec<NewProduct> {
        self.products.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForecastApi for MockApi {
    async fn list_skus(&self) -> Result<Vec<Sku>, CoreError> {
        if self.fail_skus {
            return Err(CoreError::Network("connection refused".into()));
        }
        Ok(catalog())
    }

    async fn list_trends(&self) -> Result<Vec<TrendPoint>, CoreError> {
        if self.fail_trends {
            return Err(CoreError::Network("connection refused".into()));
        }
        Ok(vec![TrendPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            sentiment: 0.5,
            search_volume: 48.0,
        }])
    }

    async fn predict(&self, request: &ForecastRequest) -> Result<ForecastResponse, CoreError> {
        self.predictions.lock().unwrap().push(request.clone());
        if !self.predict_delay.is_zero() {
            tokio::time::sleep(self.predict_delay).await;
        }
        if self.fail_predict {
            return Err(CoreError::Api {
                endpoint: "/predict".into(),
                message: "Model not loaded".into(),
            });
        }
        let bump = if request.promo_active { 50 } else { 0 };
        let demand: Vec<u32> = BASE_DEMAND.iter().map(|d| d + bump).collect();
        Ok(response(&demand, if request.promo_active { 50.0 } else { 0.0 }))
    }

    async fn add_product(&self, product: &NewProduct) -> Result<ProductCreated, CoreError> {
        self.products.lock().unwrap().push(product.clone());
        if let Some(message) = &self.add_error {
            return Err(CoreError::Api {
                endpoint: "/add-product".into(),
                message: message.clone(),
            });
        }
        Ok(ProductCreated {
            message: "Product added successfully".into(),
            product: Sku::new(&product.sku_id, &product.name, &product.category, product.base_price),
        })
    }

    async fn health(&self) -> Result<String, CoreError> {
        Ok("healthy".into())
    }
}

/// Key/value store that stays inspectable after being handed to a gate.
#[derive(Clone, Default)]
struct SharedStore(Arc<MemoryStore>);

impl KeyValueStore for SharedStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.0.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.0.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), CoreError> {
        self.0.remove_item(key)
    }
}

fn gate(store: &SharedStore) -> SessionGate {
    SessionGate::new(Box::new(LocalSessionStore::new(store.clone())))
}

fn ada() -> User {
    User::new("Ada", "ada@example.com")
}

async fn mounted_panel(api: &MockApi) -> ForecastPanel {
    let mut panel = ForecastPanel::new();
    panel.mount(api).await;
    panel
}

// ═══════════════════════════════════════════════════════════════════
// Session gate
// ═══════════════════════════════════════════════════════════════════

mod session_gate {
    use super::*;

    #[test]
    fn starts_signed_out_without_record() {
        let store = SharedStore::default();
        let mut gate = gate(&store);
        assert!(!gate.start());
        assert!(!gate.is_authenticated());
        assert!(gate.user().is_none());
    }

    #[test]
    fn stored_record_restores_session() {
        let store = SharedStore::default();
        store
            .set_item(USER_KEY, &serde_json::to_string(&ada()).unwrap())
            .unwrap();

        let mut gate = gate(&store);
        assert!(gate.start());
        assert_eq!(gate.user(), Some(&ada()));
    }

    #[test]
    fn login_persists_record() {
        let store = SharedStore::default();
        let mut gate = gate(&store);
        gate.login(ada()).unwrap();

        assert!(gate.is_authenticated());
        let raw = store.get_item(USER_KEY).unwrap().unwrap();
        assert_eq!(serde_json::from_str::<User>(&raw).unwrap(), ada());

        // A fresh gate over the same store picks the session up.
        assert!(super::gate(&store).start());
    }

    #[test]
    fn logout_removes_record() {
        let store = SharedStore::default();
        let mut gate = gate(&store);
        gate.login(ada()).unwrap();
        gate.logout().unwrap();

        assert!(!gate.is_authenticated());
        assert_eq!(store.get_item(USER_KEY).unwrap(), None);
        assert!(!super::gate(&store).start());
    }

    #[test]
    fn login_stores_record_as_given() {
        let store = SharedStore::default();
        let mut gate = gate(&store);
        let handed_over = User::new("ops team", "ops-desk");
        gate.login(handed_over.clone()).unwrap();

        assert_eq!(gate.user(), Some(&handed_over));
        let raw = store.get_item(USER_KEY).unwrap().unwrap();
        assert_eq!(serde_json::from_str::<User>(&raw).unwrap(), handed_over);
    }

    #[test]
    fn failed_save_keeps_session_signed_out() {
        struct ReadOnly;

        impl SessionStore for ReadOnly {
            fn load(&self) -> Result<Option<User>, CoreError> {
                Ok(None)
            }
            fn save(&self, _: &User) -> Result<(), CoreError> {
                Err(CoreError::FileIO("read-only file system".into()))
            }
            fn clear(&self) -> Result<(), CoreError> {
                Ok(())
            }
        }

        let mut gate = SessionGate::new(Box::new(ReadOnly));
        let err = gate.login(ada()).unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn corrupted_record_means_signed_out() {
        let store = SharedStore::default();
        store.set_item(USER_KEY, "not json").unwrap();
        assert!(!gate(&store).start());
    }

    #[test]
    fn complete_login_adopts_external_record() {
        let store = SharedStore::default();
        let mut gate = gate(&store);
        assert!(!gate.start());

        store
            .set_item(USER_KEY, &serde_json::to_string(&ada()).unwrap())
            .unwrap();
        assert!(gate.complete_login());
        assert_eq!(gate.user().map(|u| u.name.as_str()), Some("Ada"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Router
// ═══════════════════════════════════════════════════════════════════

mod router {
    use super::*;

    #[test]
    fn starts_on_dashboard() {
        let router = SectionRouter::new();
        assert_eq!(router.active(), Section::Dashboard);
        assert_eq!(router.view(), View::Dashboard);
        assert_eq!(router.mount_key(), 0);
    }

    #[test]
    fn switching_bumps_mount_key() {
        let mut router = SectionRouter::new();
        assert!(router.navigate(Section::Products));
        assert_eq!(router.view(), View::AddProduct);
        assert_eq!(router.mount_key(), 1);

        assert!(!router.navigate(Section::Products));
        assert_eq!(router.mount_key(), 1);
    }

    #[test]
    fn forecast_section_remounts_dashboard_view() {
        let mut router = SectionRouter::new();
        assert!(router.navigate(Section::Forecast));
        assert_eq!(router.view(), View::Dashboard);
        assert_eq!(router.mount_key(), 1);
    }

    #[test]
    fn reset_returns_to_dashboard() {
        let mut router = SectionRouter::new();
        router.navigate(Section::Trends);
        router.reset();
        assert_eq!(router.active(), Section::Dashboard);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Forecast panel
// ═══════════════════════════════════════════════════════════════════

mod forecast_panel {
    use super::*;

    #[tokio::test]
    async fn mount_selects_first_sku_and_loads_forecast() {
        let api = MockApi::default();
        let mut panel = ForecastPanel::new();
        let outcome = panel.mount(&api).await;

        assert_eq!(outcome, Some(ApplyOutcome::Applied));
        assert_eq!(panel.skus().len(), 3);
        assert_eq!(panel.trends().len(), 1);
        assert_eq!(panel.selected_sku().unwrap().id, "SKU001");
        assert_eq!(panel.price(), 2.99);
        assert!(!panel.promo_active());
        assert_eq!(panel.forecast().unwrap().len(), 7);
        assert!(!panel.is_loading());
        assert!(panel.error().is_none());

        assert_eq!(
            api.predictions(),
            vec![ForecastRequest {
                sku_id: "SKU001".into(),
                price: 2.99,
                promo_active: false,
            }]
        );
    }

    #[tokio::test]
    async fn selecting_sku_resets_price_and_refetches() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;
        panel.set_price(1.99).unwrap();

        let ticket = panel.select_sku("SKU002").unwrap().unwrap();
        assert_eq!(ticket.request.sku_id, "SKU002");
        assert_eq!(ticket.request.price, 8.99);
        assert_eq!(panel.run(&api, ticket).await, ApplyOutcome::Applied);
        assert_eq!(panel.price(), 8.99);
    }

    #[tokio::test]
    async fn reselecting_current_sku_is_a_no_op() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;
        assert!(panel.select_sku("SKU001").unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_sku_is_an_error() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;
        let err = panel.select_sku("SKU999").unwrap_err();
        assert!(matches!(err, CoreError::SkuNotFound(id) if id == "SKU999"));
    }

    #[tokio::test]
    async fn price_change_refetches_with_new_price() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;

        let ticket = panel.set_price(2.49).unwrap();
        assert_eq!(ticket.request.price, 2.49);
        assert!(panel.is_loading());
        panel.run(&api, ticket).await;

        assert_eq!(api.predictions().last().unwrap().price, 2.49);
        let change = panel.price_change().unwrap();
        assert_eq!(change.direction, PriceDirection::Down);
    }

    #[tokio::test]
    async fn invalid_or_unchanged_price_is_ignored() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;
        assert!(panel.set_price(-1.0).is_none());
        assert!(panel.set_price(f64::NAN).is_none());
        assert!(panel.set_price(2.99).is_none());
        assert_eq!(api.predictions().len(), 1);
    }

    #[tokio::test]
    async fn promo_toggle_raises_demand() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;
        let before = panel.summary().unwrap();

        let ticket = panel.toggle_promo().unwrap();
        assert!(ticket.request.promo_active);
        panel.run(&api, ticket).await;

        let after = panel.summary().unwrap();
        assert_eq!(after.min_demand, before.min_demand + 50);
        assert_eq!(panel.kpis().unwrap().uplift, 50.0);
        assert_eq!(panel.promo_impact(), PromoImpact::for_flag(true));
        assert!(panel.set_promo(true).is_none());
    }

    #[tokio::test]
    async fn older_response_arriving_last_is_discarded() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;

        let first = panel.set_price(2.00).unwrap();
        let second = panel.set_price(2.50).unwrap();
        assert!(second.id > first.id);

        assert_eq!(
            panel.apply_forecast(second.id, Ok(response(&[10; 7], 0.0))),
            ApplyOutcome::Applied
        );
        assert_eq!(
            panel.apply_forecast(first.id, Ok(response(&[99; 7], 0.0))),
            ApplyOutcome::Stale
        );
        assert_eq!(panel.forecast().unwrap()[0].demand, 10);
        assert_eq!(panel.price(), 2.50);
    }

    #[tokio::test]
    async fn older_response_arriving_first_is_discarded() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;

        let first = panel.set_price(2.00).unwrap();
        let second = panel.set_price(2.50).unwrap();

        assert_eq!(
            panel.apply_forecast(first.id, Ok(response(&[99; 7], 0.0))),
            ApplyOutcome::Stale
        );
        assert!(panel.is_loading());
        assert_eq!(
            panel.apply_forecast(second.id, Ok(response(&[10; 7], 0.0))),
            ApplyOutcome::Applied
        );
        assert_eq!(panel.forecast().unwrap()[0].demand, 10);
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn older_failure_does_not_overwrite_newer_result() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;

        let first = panel.set_price(2.00).unwrap();
        let second = panel.set_price(2.50).unwrap();
        panel.apply_forecast(second.id, Ok(response(&[10; 7], 0.0)));
        let late = panel.apply_forecast(first.id, Err(CoreError::Network("reset".into())));

        assert_eq!(late, ApplyOutcome::Stale);
        assert!(panel.error().is_none());
    }

    #[tokio::test]
    async fn unmount_discards_in_flight_result() {
        let api = MockApi::default();
        let mut panel = mounted_panel(&api).await;

        let ticket = panel.set_price(2.00).unwrap();
        panel.unmount();
        assert!(!panel.is_mounted());
        assert_eq!(
            panel.apply_forecast(ticket.id, Ok(response(&[1; 7], 0.0))),
            ApplyOutcome::Stale
        );
        assert_eq!(panel.forecast().unwrap()[0].demand, BASE_DEMAND[0]);
        assert!(panel.set_price(3.00).is_none());
    }

    #[tokio::test]
    async fn sku_failure_shows_error_and_skips_forecast() {
        let api = MockApi {
            fail_skus: true,
            ..MockApi::default()
        };
        let mut panel = ForecastPanel::new();
        assert_eq!(panel.mount(&api).await, None);

        assert_eq!(panel.error(), Some(SKUS_FAILED));
        assert!(panel.selected_sku().is_none());
        assert!(api.predictions().is_empty());
        assert_eq!(panel.trends().len(), 1);
    }

    #[tokio::test]
    async fn trend_failure_is_silent() {
        let api = MockApi {
            fail_trends: true,
            ..MockApi::default()
        };
        let panel = mounted_panel(&api).await;
        assert!(panel.trends().is_empty());
        assert!(panel.error().is_none());
        assert!(panel.forecast().is_some());
    }

    #[tokio::test]
    async fn predict_failure_shows_error() {
        let api = MockApi {
            fail_predict: true,
            ..MockApi::default()
        };
        let mut panel = ForecastPanel::new();
        assert_eq!(panel.mount(&api).await, Some(ApplyOutcome::Failed));
        assert_eq!(panel.error(), Some(FORECAST_FAILED));
        assert!(panel.forecast().is_none());
        assert!(!panel.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_predict_times_out() {
        let api = MockApi {
            predict_delay: Duration::from_secs(60),
            ..MockApi::default()
        };
        let mut panel = ForecastPanel::with_timeout(Duration::from_secs(5));
        assert_eq!(panel.mount(&api).await, Some(ApplyOutcome::Failed));
        assert_eq!(panel.error(), Some(FORECAST_FAILED));
    }

    #[tokio::test]
    async fn derived_views_follow_forecast() {
        let api = MockApi::default();
        let panel = mounted_panel(&api).await;

        let summary = panel.summary().unwrap();
        assert_eq!(summary.min_demand, 90);
        assert_eq!(summary.max_demand, 140);
        assert_eq!(summary.avg_demand, 114);

        let cards = panel.kpi_cards();
        assert_eq!(cards[0].title, "MAPE");
        assert_eq!(cards[0].display_value(), 12.3);
        assert_eq!(cards[1].display_value(), 94.6);

        let chart = panel.trend_chart();
        assert_eq!(chart[0].sentiment_percent, 50.0);
        assert_eq!(panel.navigator().indicator_count(), 7);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Product form
// ═══════════════════════════════════════════════════════════════════

mod product_form {
    use super::*;

    fn filled() -> ProductForm {
        let mut form = ProductForm::new();
        form.set_field(ProductField::Name, "Sourdough Loaf");
        form.set_field(ProductField::Category, "Bakery");
        form.set_field(ProductField::BasePrice, "4.50");
        form
    }

    fn is_generated_sku(id: &str) -> bool {
        let b = id.as_bytes();
        b.len() == 12
            && id.starts_with("SKU")
            && b[3..9].iter().all(u8::is_ascii_digit)
            && b[9..]
                .iter()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    }

    #[tokio::test]
    async fn missing_required_fields_never_reach_the_service() {
        let api = MockApi::default();

        for missing in [ProductField::Name, ProductField::Category, ProductField::BasePrice] {
            let mut form = filled();
            form.set_field(missing, "");
            let err = form.submit(&api).await.unwrap_err();
            assert!(matches!(err, CoreError::ValidationError(_)));
            assert_eq!(form.error(), Some(MISSING_FIELDS));
        }
        assert!(api.products().is_empty());
    }

    #[tokio::test]
    async fn blank_sku_id_is_generated() {
        let api = MockApi::default();
        let mut form = filled();
        let created = form.submit(&api).await.unwrap();

        assert!(is_generated_sku(&created.product.id), "got {}", created.product.id);
        assert_eq!(api.products()[0].sku_id, created.product.id);
        assert!(matches!(form.status(), SubmitStatus::Succeeded { .. }));
        assert_eq!(form.last_created(), Some(&created));
    }

    #[tokio::test]
    async fn provided_sku_id_is_kept() {
        let api = MockApi::default();
        let mut form = filled();
        form.set_field(ProductField::SkuId, "SKU777");
        form.submit(&api).await.unwrap();
        assert_eq!(api.products()[0].sku_id, "SKU777");
    }

    #[tokio::test]
    async fn numeric_fields_are_coerced() {
        let api = MockApi::default();
        let mut form = filled();
        form.set_field(ProductField::BasePrice, "4.5 USD");
        form.set_field(ProductField::LeadTimeDays, "7 days");
        form.set_field(ProductField::MinOrderQuantity, "abc");
        form.submit(&api).await.unwrap();

        let sent = &api.products()[0];
        assert_eq!(sent.base_price, 4.5);
        assert_eq!(sent.lead_time_days, 7);
        assert_eq!(sent.min_order_quantity, 50);
    }

    #[tokio::test]
    async fn server_message_is_shown_verbatim() {
        let api = MockApi {
            add_error: Some("SKU already exists".into()),
            ..MockApi::default()
        };
        let mut form = filled();
        assert!(form.submit(&api).await.is_err());
        assert_eq!(form.error(), Some("SKU already exists"));

        form.dismiss_error();
        assert_eq!(form.status(), &SubmitStatus::Idle);
        assert_eq!(form.draft().name, "Sourdough Loaf");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back_to_generic_message() {
        struct Hanging;

        #[async_trait]
        impl ForecastApi for Hanging {
            async fn list_skus(&self) -> Result<Vec<Sku>, CoreError> {
                Ok(Vec::new())
            }
            async fn list_trends(&self) -> Result<Vec<TrendPoint>, CoreError> {
                Ok(Vec::new())
            }
            async fn predict(&self, _: &ForecastRequest) -> Result<ForecastResponse, CoreError> {
                Err(CoreError::Network("unused".into()))
            }
            async fn add_product(&self, _: &NewProduct) -> Result<ProductCreated, CoreError> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(CoreError::Network("unreachable".into()))
            }
            async fn health(&self) -> Result<String, CoreError> {
                Ok("healthy".into())
            }
        }

        let mut form = ProductForm::with_timings(Duration::from_secs(3), Duration::from_secs(10));
        form.set_field(ProductField::Name, "Milk");
        form.set_field(ProductField::Category, "Dairy");
        form.set_field(ProductField::BasePrice, "1");

        let err = form.submit(&Hanging).await.unwrap_err();
        assert!(matches!(err, CoreError::Timeout(_)));
        assert_eq!(form.error(), Some(SUBMIT_FAILED));
    }

    #[tokio::test]
    async fn form_clears_after_reset_delay() {
        let api = MockApi::default();
        let mut form = filled();
        form.submit(&api).await.unwrap();

        assert!(!form.poll_reset(Instant::now()));
        assert_eq!(form.draft().name, "Sourdough Loaf");

        let SubmitStatus::Succeeded { reset_at } = form.status().clone() else {
            panic!("expected success, got {:?}", form.status());
        };
        assert!(form.poll_reset(reset_at));
        assert_eq!(form.draft(), &ProductDraft::default());
        assert_eq!(form.status(), &SubmitStatus::Idle);
    }

    #[test]
    fn lead_time_and_min_order_defaults() {
        let draft = ProductDraft {
            name: "Eggs".into(),
            category: "Dairy".into(),
            base_price: "3".into(),
            lead_time_days: "0".into(),
            min_order_quantity: "-5".into(),
            sku_id: "SKU1".into(),
            ..ProductDraft::default()
        };
        let product = prepare_product(&draft, chrono::Utc::now()).unwrap();
        assert_eq!(product.lead_time_days, 3);
        assert_eq!(product.min_order_quantity, 50);
    }

    #[test]
    fn unparseable_price_is_rejected() {
        let draft = ProductDraft {
            name: "Eggs".into(),
            category: "Dairy".into(),
            base_price: "free".into(),
            ..ProductDraft::default()
        };
        let err = prepare_product(&draft, chrono::Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn sku_id_format() {
        assert_eq!(format_sku_id(1_700_000_654_321, [1, 2, 3]), "SKU654321123");
        assert!(is_generated_sku(&format_sku_id(5, [200, 100, 255])));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Market trends panel
// ═══════════════════════════════════════════════════════════════════

mod market_panel {
    use super::*;
    use supply_forecast_core::api::static_trends::StaticTrendSource;

    struct FailingSource;

    #[async_trait]
    impl TrendSource for FailingSource {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn fetch(&self, _: TrendTimeframe) -> Result<MarketSnapshot, CoreError> {
            Err(CoreError::Network("feed offline".into()))
        }
    }

    #[tokio::test]
    async fn loads_snapshot() {
        let mut panel = MarketTrendsPanel::new();
        assert!(panel.is_loading());
        panel.load(&StaticTrendSource::new()).await;

        assert!(!panel.is_loading());
        assert_eq!(panel.timeframe(), TrendTimeframe::Week);
        assert_eq!(panel.trends().len(), 8);
        assert_eq!(panel.popular_products().len(), 4);
    }

    #[tokio::test]
    async fn timeframe_change_reloads() {
        let source = StaticTrendSource::new();
        let mut panel = MarketTrendsPanel::new();
        panel.load(&source).await;

        assert!(!panel.select_timeframe(&source, TrendTimeframe::Week).await);
        assert!(panel.select_timeframe(&source, TrendTimeframe::Quarter).await);
        assert_eq!(panel.timeframe(), TrendTimeframe::Quarter);
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn failure_shows_error() {
        let mut panel = MarketTrendsPanel::new();
        panel.load(&FailingSource).await;
        assert_eq!(panel.error(), Some(TRENDS_FAILED));
        assert!(!panel.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out() {
        let source = StaticTrendSource::with_latency(Duration::from_secs(120));
        let mut panel = MarketTrendsPanel::with_timeout(Duration::from_secs(2));
        panel.load(&source).await;
        assert_eq!(panel.error(), Some(TRENDS_FAILED));
    }

    #[tokio::test]
    async fn rated_products_carry_tiers() {
        let mut panel = MarketTrendsPanel::new();
        panel.load(&StaticTrendSource::new()).await;

        let rated = panel.rated_products();
        let (avocados, score, sentiment) = rated[3];
        assert_eq!(avocados.name, "Fresh Avocados");
        assert_eq!(score, Tier::High);
        assert_eq!(sentiment, Tier::Medium);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Presentation helpers
// ═══════════════════════════════════════════════════════════════════

mod presentation {
    use super::*;

    #[test]
    fn summary_of_empty_forecast_is_none() {
        assert!(ForecastSummary::from_points(&[]).is_none());
    }

    #[test]
    fn summary_rounds_average() {
        let s = ForecastSummary::from_points(&points(&BASE_DEMAND)).unwrap();
        assert_eq!((s.min_demand, s.avg_demand, s.max_demand), (90, 114, 140));
        assert_eq!(s.total_demand, 795);
    }

    #[test]
    fn demand_levels() {
        assert_eq!(DemandLevel::classify(140, 113.6), DemandLevel::High);
        assert_eq!(DemandLevel::classify(90, 113.6), DemandLevel::Low);
        assert_eq!(DemandLevel::classify(110, 113.6), DemandLevel::Normal);
        assert_eq!(DemandLevel::classify(10, 0.0), DemandLevel::Normal);
        assert_eq!(DemandLevel::High.to_string(), "High");
    }

    #[test]
    fn bar_width() {
        assert_eq!(demand_bar_pct(70, 140), 50.0);
        assert_eq!(demand_bar_pct(140, 140), 100.0);
        assert_eq!(demand_bar_pct(5, 0), 0.0);
    }

    #[test]
    fn navigator_moves_within_bounds() {
        let mut nav = DayNavigator::new(7);
        assert!(!nav.can_prev());
        nav.prev();
        assert_eq!(nav.current(), 0);

        for _ in 0..10 {
            nav.next();
        }
        assert_eq!(nav.current(), 6);
        assert!(!nav.can_next());
        assert_eq!(nav.label(), "Day 7 of 7-day forecast");

        assert!(!nav.jump(7));
        assert!(nav.jump(2));
        assert_eq!(nav.indicators(), vec![false, false, true, false, false, false, false]);
    }

    #[test]
    fn navigator_clamps_on_shorter_forecast() {
        let mut nav = DayNavigator::new(7);
        nav.jump(6);
        nav.set_len(3);
        assert_eq!(nav.current(), 2);
        nav.set_len(0);
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn day_detail_for_current_day() {
        let pts = points(&BASE_DEMAND);
        let mut nav = DayNavigator::new(pts.len());
        nav.jump(5);

        let detail = day_detail(&pts, &nav).unwrap();
        assert_eq!(detail.point.demand, 140);
        assert_eq!(detail.level, DemandLevel::High);
        assert_eq!(detail.bar_pct, 100.0);
        assert_eq!(detail.label, "Day 6 of 7-day forecast");

        assert!(day_detail(&[], &nav).is_none());
    }

    #[test]
    fn kpi_cards_without_data_show_zero() {
        let cards = kpi_cards(None);
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, ["MAPE", "Fill Rate", "Promo Uplift", "Avg Demand"]);
        assert!(cards.iter().all(|c| c.value == 0.0));
        assert_eq!(cards[3].unit, "units");
    }

    #[test]
    fn price_change_text() {
        let up = PriceChange::compute(3.30, 3.00).unwrap();
        assert_eq!(up.direction, PriceDirection::Up);
        assert_eq!(up.text(), "+10.0%");

        let down = PriceChange::compute(2.25, 3.00).unwrap();
        assert_eq!(down.text(), "-25.0%");

        assert_eq!(PriceChange::compute(3.0, 3.0).unwrap().text(), "No change");
        assert!(PriceChange::compute(1.0, 0.0).is_none());
    }

    #[test]
    fn promo_impact_lines() {
        assert_eq!(PromoImpact::for_flag(true).promo_effect, "+50% Demand");
        assert_eq!(PromoImpact::for_flag(false).combined_effect, "Standard Demand");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Executors other than Tokio
// ═══════════════════════════════════════════════════════════════════

mod foreign_executor {
    use super::*;
    use futures::executor::block_on;
    use supply_forecast_core::api::static_trends::StaticTrendSource;
    use supply_forecast_core::services::timer::Timer;

    /// Timer whose every delay has already elapsed.
    #[derive(Debug)]
    struct Elapsed;

    #[async_trait]
    impl Timer for Elapsed {
        async fn sleep(&self, _: Duration) {}
    }

    /// Service whose product call never completes.
    struct Unresponsive;

    #[async_trait]
    impl ForecastApi for Unresponsive {
        async fn list_skus(&self) -> Result<Vec<Sku>, CoreError> {
            futures::future::pending().await
        }
        async fn list_trends(&self) -> Result<Vec<TrendPoint>, CoreError> {
            futures::future::pending().await
        }
        async fn predict(&self, _: &ForecastRequest) -> Result<ForecastResponse, CoreError> {
            futures::future::pending().await
        }
        async fn add_product(&self, _: &NewProduct) -> Result<ProductCreated, CoreError> {
            futures::future::pending().await
        }
        async fn health(&self) -> Result<String, CoreError> {
            futures::future::pending().await
        }
    }

    #[test]
    fn market_panel_loads_without_runtime() {
        let mut panel = MarketTrendsPanel::new();
        block_on(panel.load(&StaticTrendSource::new()));
        assert!(!panel.is_loading());
        assert!(panel.error().is_none());
        assert_eq!(panel.trends().len(), 8);
    }

    #[test]
    fn forecast_panel_mounts_without_runtime() {
        let api = MockApi::default();
        let mut panel = ForecastPanel::new();
        assert_eq!(block_on(panel.mount(&api)), Some(ApplyOutcome::Applied));
        assert_eq!(panel.forecast().unwrap().len(), 7);

        let ticket = panel.toggle_promo().unwrap();
        assert_eq!(block_on(panel.run(&api, ticket)), ApplyOutcome::Applied);
    }

    #[test]
    fn product_form_submits_without_runtime() {
        let api = MockApi::default();
        let mut form = ProductForm::new();
        form.set_field(ProductField::Name, "Oat Milk");
        form.set_field(ProductField::Category, "Beverages");
        form.set_field(ProductField::BasePrice, "2.79");

        let created = block_on(form.submit(&api)).unwrap();
        assert_eq!(created.product.name, "Oat Milk");
    }

    #[test]
    fn simulated_latency_elapses_without_runtime() {
        let source = StaticTrendSource::with_latency(Duration::from_millis(30));
        let start = Instant::now();
        let snapshot = block_on(source.fetch(TrendTimeframe::Week)).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(snapshot.popular_products.len(), 4);
    }

    #[test]
    fn injected_timer_bounds_requests() {
        let mut form = ProductForm::new().with_timer(Arc::new(Elapsed));
        form.set_field(ProductField::Name, "Oat Milk");
        form.set_field(ProductField::Category, "Beverages");
        form.set_field(ProductField::BasePrice, "2.79");

        let err = block_on(form.submit(&Unresponsive)).unwrap_err();
        assert!(matches!(err, CoreError::Timeout(ref endpoint) if endpoint == "/add-product"));
        assert_eq!(form.error(), Some(SUBMIT_FAILED));
    }

    #[test]
    fn injected_timer_bounds_panel_mount() {
        let mut panel = ForecastPanel::new().with_timer(Arc::new(Elapsed));
        assert_eq!(block_on(panel.mount(&Unresponsive)), None);
        assert_eq!(panel.error(), Some(SKUS_FAILED));
    }
}
