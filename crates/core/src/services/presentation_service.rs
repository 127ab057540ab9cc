//! Pure derivations from fetched data into what the panels display.
//!
//! Nothing here performs I/O; every function is a projection of a forecast,
//! KPI set, or trend series into display values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::forecast::{ForecastPoint, Kpis};
use crate::models::trend::TrendPoint;

// ── Forecast summary ────────────────────────────────────────────────

/// Min / average / max of the demand values in a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub min_demand: u32,
    /// Mean demand rounded to the nearest unit (halves round up)
    pub avg_demand: u32,
    pub max_demand: u32,
    /// Unrounded mean, used for demand-level classification
    pub mean_demand: f64,
    pub total_demand: u64,
}

impl ForecastSummary {
    /// `None` for an empty forecast.
    pub fn from_points(points: &[ForecastPoint]) -> Option<Self> {
        let min_demand = points.iter().map(|p| p.demand).min()?;
        let max_demand = points.iter().map(|p| p.demand).max()?;
        let total_demand: u64 = points.iter().map(|p| u64::from(p.demand)).sum();
        let mean_demand = total_demand as f64 / points.len() as f64;
        Some(Self {
            min_demand,
            avg_demand: mean_demand.round() as u32,
            max_demand,
            mean_demand,
            total_demand,
        })
    }
}

/// How a single day compares with the forecast's mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    High,
    Normal,
    Low,
}

impl DemandLevel {
    /// Ratio to the mean above 1.2 is high, below 0.8 is low.
    pub fn classify(demand: u32, mean: f64) -> Self {
        if mean <= 0.0 {
            return DemandLevel::Normal;
        }
        let ratio = f64::from(demand) / mean;
        if ratio > 1.2 {
            DemandLevel::High
        } else if ratio < 0.8 {
            DemandLevel::Low
        } else {
            DemandLevel::Normal
        }
    }
}

impl std::fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandLevel::High => write!(f, "High"),
            DemandLevel::Normal => write!(f, "Normal"),
            DemandLevel::Low => write!(f, "Low"),
        }
    }
}

/// Width of a day's demand bar relative to the busiest day, in percent (0–100).
pub fn demand_bar_pct(demand: u32, max_demand: u32) -> f64 {
    if max_demand == 0 {
        return 0.0;
    }
    (f64::from(demand) / f64::from(max_demand) * 100.0).min(100.0)
}

// ── Day navigator ───────────────────────────────────────────────────

/// Cursor over the days of a forecast, with one indicator per day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayNavigator {
    len: usize,
    current: usize,
}

impl DayNavigator {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    /// Adopt a new forecast length, keeping the cursor when it still fits.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.current = self.current.min(len.saturating_sub(1));
    }

    #[must_use]
    pub fn indicator_count(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.current > 0
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        self.current + 1 < self.len
    }

    pub fn prev(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn next(&mut self) {
        if self.can_next() {
            self.current += 1;
        }
    }

    /// Jump to `index`. Out-of-range indices are ignored and return `false`.
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.current = index;
        true
    }

    /// Which indicator is highlighted, in order.
    pub fn indicators(&self) -> Vec<bool> {
        (0..self.len).map(|i| i == self.current).collect()
    }

    /// e.g. "Day 3 of 7-day forecast"
    pub fn label(&self) -> String {
        format!("Day {} of {}-day forecast", self.current + 1, self.len)
    }
}

/// Everything the day-by-day card shows for the day under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct DayDetail<'a> {
    pub point: &'a ForecastPoint,
    pub level: DemandLevel,
    pub bar_pct: f64,
    pub label: String,
}

/// Details for the navigator's current day, or `None` without a forecast.
pub fn day_detail<'a>(points: &'a [ForecastPoint], nav: &DayNavigator) -> Option<DayDetail<'a>> {
    let summary = ForecastSummary::from_points(points)?;
    let point = points.get(nav.current())?;
    Some(DayDetail {
        point,
        level: DemandLevel::classify(point.demand, summary.mean_demand),
        bar_pct: demand_bar_pct(point.demand, summary.max_demand),
        label: nav.label(),
    })
}

// ── KPI cards ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl KpiCard {
    /// Value as shown on the card: one decimal place.
    pub fn display_value(&self) -> f64 {
        (self.value * 10.0).round() / 10.0
    }
}

/// The four KPI cards, in display order. Missing KPIs show as zero.
pub fn kpi_cards(kpis: Option<&Kpis>) -> [KpiCard; 4] {
    let k = kpis.cloned().unwrap_or_default();
    [
        KpiCard { title: "MAPE", value: k.mape, unit: "%" },
        KpiCard { title: "Fill Rate", value: k.fill_rate, unit: "%" },
        KpiCard { title: "Promo Uplift", value: k.uplift, unit: "%" },
        KpiCard { title: "Avg Demand", value: k.avg_demand, unit: "units" },
    ]
}

// ── Trend chart ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChartPoint {
    pub date: NaiveDate,
    pub sentiment_percent: f64,
    pub search_volume: f64,
}

pub fn trend_chart(trends: &[TrendPoint]) -> Vec<TrendChartPoint> {
    trends
        .iter()
        .map(|t| TrendChartPoint {
            date: t.date,
            sentiment_percent: t.sentiment * 100.0,
            search_volume: t.search_volume,
        })
        .collect()
}

// ── Promo simulator ─────────────────────────────────────────────────

/// Direction of the simulated price relative to the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
    Unchanged,
}

/// Simulated price versus the SKU's base price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    /// Percent change from base price
    pub pct: f64,
    pub direction: PriceDirection,
}

impl PriceChange {
    /// `None` when the base price is zero (no meaningful percentage).
    pub fn compute(price: f64, base_price: f64) -> Option<Self> {
        if base_price == 0.0 {
            return None;
        }
        let pct = (price - base_price) / base_price * 100.0;
        let direction = if pct > 0.0 {
            PriceDirection::Up
        } else if pct < 0.0 {
            PriceDirection::Down
        } else {
            PriceDirection::Unchanged
        };
        Some(Self { pct, direction })
    }

    /// "+12.5%", "-3.0%" or "No change".
    pub fn text(&self) -> String {
        match self.direction {
            PriceDirection::Unchanged => "No change".to_string(),
            _ => format!("{:+.1}%", self.pct),
        }
    }
}

/// Expected-impact lines of the promo simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoImpact {
    pub promo_effect: &'static str,
    pub combined_effect: &'static str,
}

impl PromoImpact {
    pub fn for_flag(promo_active: bool) -> Self {
        if promo_active {
            Self {
                promo_effect: "+50% Demand",
                combined_effect: "High Demand Expected",
            }
        } else {
            Self {
                promo_effect: "No Promo",
                combined_effect: "Standard Demand",
            }
        }
    }
}
