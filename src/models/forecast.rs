use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::errors::ForecastError;

/// Forecasting algorithms supported by the engine.
///
/// A closed set: method names arriving as strings are parsed at the
/// boundary and unrecognized names fail with
/// [`ForecastError::UnknownMethod`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage,
    LinearRegression,
    ExponentialSmoothing,
}

impl ForecastMethod {
    pub fn parse(name: &str) -> Result<Self, ForecastError> {
        name.parse()
            .map_err(|_| ForecastError::UnknownMethod(name.to_string()))
    }
}

/// Restock urgency.
///
/// Variant order drives recommendation sorting: High sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestockPriority {
    High,
    Medium,
    Low,
}

/// Stock position of a product relative to forecasted demand.
///
/// Classification order: critical takes precedence over warning, warning
/// over excess.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Warning,
    Excess,
    Normal,
}

/// A restock recommendation for one product.
///
/// Recomputed on every request from the current snapshot; never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRecommendation {
    pub product: Product,
    pub current_stock: i32,
    pub avg_daily_sales: f64,
    pub forecasted_demand: f64,
    /// `None` means consumption is zero and no stock-out is projected.
    pub days_until_stock_out: Option<i64>,
    pub recommended_order: i64,
    pub priority: RestockPriority,
}

/// A per-product demand forecast over a fixed horizon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedForecast {
    pub product: Product,
    pub avg_daily_sales: f64,
    /// Forecast horizon in days
    pub forecast_period: u32,
    /// Demand summed over the horizon
    pub forecasted_demand: f64,
    /// One value per forecast day, oldest first
    pub daily_forecasts: Vec<f64>,
    pub stock_status: StockStatus,
    pub days_until_stock_out: Option<i64>,
}

/// Aggregate view over one forecast run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    /// Products needing restock within the horizon
    pub restock_count: usize,
    /// Forecasted demand priced at current product prices
    pub predicted_sales_value: Decimal,
    /// Products either critical or projected to stock out within the horizon
    pub stock_out_risk: usize,
    /// Mean forecast confidence, percent
    pub forecast_accuracy: f64,
}
