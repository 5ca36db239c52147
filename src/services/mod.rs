// Forecasting over product/sale snapshots
pub mod forecasting;

// Dashboard metrics and sales reporting
pub mod analytics;

pub use analytics::AnalyticsService;
pub use forecasting::ForecastingService;
