//! The demand-forecasting engine.
//!
//! Pure, synchronous computation over in-memory product and sale records:
//! per-product daily sales series, point-forecast algorithms, restock
//! recommendations, and stock-status classification. Nothing here performs
//! I/O or holds state between calls; given identical inputs every function
//! is deterministic.

pub mod accuracy;
pub mod algorithms;
pub mod restock;
pub mod series;

pub use accuracy::{calculate_accuracy, AccuracyMetrics};
pub use algorithms::{
    exponential_smoothing, generate_forecast, linear_regression, moving_average, seasonal_factors,
    ForecastOptions,
};
pub use restock::{detailed_forecasts, forecast_summary, restock_recommendations};
pub use series::DailySeries;

/// Trailing window, in days, over which sales history is aggregated.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
