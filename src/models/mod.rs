// Record types owned by the external document store
pub mod product;
pub mod sale;

// Derived forecast records, recomputed on every request
pub mod forecast;

pub use forecast::{
    DetailedForecast, ForecastMethod, ForecastSummary, RestockPriority, RestockRecommendation,
    StockStatus,
};
pub use product::Product;
pub use sale::{Sale, SaleTimestamp};
