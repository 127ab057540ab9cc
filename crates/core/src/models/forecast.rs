use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::sku::Sku;

/// Number of days in one forecast horizon.
pub const FORECAST_HORIZON_DAYS: usize = 7;

/// Body of `POST /predict`.
///
/// One request is issued per (SKU, price, promo flag) combination the user
/// settles on; the service recomputes the whole horizon each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub sku_id: String,
    pub price: f64,
    pub promo_active: bool,
}

/// A single day of predicted demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Calendar day (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,

    /// Predicted units sold
    pub demand: u32,

    /// Lower bound of the confidence band
    pub confidence_lower: u32,

    /// Upper bound of the confidence band
    pub confidence_upper: u32,

    /// English weekday name as sent by the service (e.g., "Monday")
    pub day_of_week: String,
}

/// Key performance indicators returned alongside a forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Mean absolute percentage error, in percent
    #[serde(default)]
    pub mape: f64,

    /// Share of demand that can be fulfilled, in percent
    #[serde(default)]
    pub fill_rate: f64,

    /// Promotional uplift, in percent
    #[serde(default)]
    pub uplift: f64,

    /// Mean daily demand over the horizon, in units
    #[serde(default)]
    pub avg_demand: f64,

    /// Sum of demand over the horizon, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_forecast: Option<u64>,
}

/// Response of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Echo of the SKU the forecast was computed for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,

    pub forecast: Vec<ForecastPoint>,

    pub kpis: Kpis,
}
