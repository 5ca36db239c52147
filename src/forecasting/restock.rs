use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::algorithms::{generate_forecast, moving_average, ForecastOptions};
use super::series::DailySeries;
use super::DEFAULT_WINDOW_DAYS;
use crate::models::{
    DetailedForecast, ForecastMethod, ForecastSummary, Product, RestockPriority,
    RestockRecommendation, Sale, StockStatus,
};

/// Days of consumption added on top of the horizon when sizing an order.
const SAFETY_BUFFER_DAYS: u32 = 7;
/// Minimum order size, as a multiple of the reorder level.
const MIN_ORDER_FACTOR: i32 = 2;
/// Stock-out within this many days is high priority.
const HIGH_PRIORITY_DAYS: i64 = 7;
/// Stock-out within this many days is medium priority.
const MEDIUM_PRIORITY_DAYS: i64 = 14;
/// Stock above reorder_level × this factor counts as excess.
const EXCESS_STOCK_FACTOR: i32 = 3;
/// Smoothing window for the demand projection in recommendations. Fixed at
/// seven days, independent of the forecast horizon.
const DEMAND_SMOOTHING_WINDOW: usize = 7;
/// Reported confidence when no product has any sales history.
const FALLBACK_CONFIDENCE: f64 = 85.0;

fn days_until_stock_out(stock: i32, avg_daily_sales: f64) -> Option<i64> {
    if avg_daily_sales > 0.0 {
        Some((stock as f64 / avg_daily_sales).floor() as i64)
    } else {
        None
    }
}

fn priority_for(days_until_stock_out: Option<i64>) -> RestockPriority {
    match days_until_stock_out {
        Some(days) if days <= HIGH_PRIORITY_DAYS => RestockPriority::High,
        Some(days) if days <= MEDIUM_PRIORITY_DAYS => RestockPriority::Medium,
        _ => RestockPriority::Low,
    }
}

fn recommended_order(product: &Product, avg_daily_sales: f64, forecast_period: u32) -> i64 {
    let safety_stock = product.reorder_level as f64;
    let projected_consumption =
        avg_daily_sales * (forecast_period + SAFETY_BUFFER_DAYS) as f64;
    let minimum_order = (product.reorder_level * MIN_ORDER_FACTOR) as f64;
    (safety_stock + projected_consumption - product.stock as f64)
        .max(minimum_order)
        .ceil() as i64
}

/// Ranks products that should be restocked within `forecast_period` days.
///
/// A product qualifies when its stock is at or below the reorder level, or
/// when its projected stock-out falls inside the horizon. Results are
/// ordered most urgent first: priority, then days until stock-out, with
/// unbounded stock-out last. Products not needing restock are omitted.
pub fn restock_recommendations(
    products: &[Product],
    sales: &[Sale],
    as_of: NaiveDate,
    forecast_period: u32,
) -> Vec<RestockRecommendation> {
    let mut recommendations: Vec<RestockRecommendation> = products
        .iter()
        .filter_map(|product| {
            let series = DailySeries::build(sales, &product.id, as_of, DEFAULT_WINDOW_DAYS);
            let avg_daily_sales = series.mean();

            let forecasted_demand = moving_average(series.values(), DEMAND_SMOOTHING_WINDOW)
                * forecast_period as f64;

            let days_until_stock_out = days_until_stock_out(product.stock, avg_daily_sales);
            let needs_restock = product.stock <= product.reorder_level
                || days_until_stock_out.is_some_and(|days| days <= forecast_period as i64);
            if !needs_restock {
                return None;
            }

            Some(RestockRecommendation {
                current_stock: product.stock,
                avg_daily_sales,
                forecasted_demand,
                days_until_stock_out,
                recommended_order: recommended_order(product, avg_daily_sales, forecast_period),
                priority: priority_for(days_until_stock_out),
                product: product.clone(),
            })
        })
        .collect();

    recommendations.sort_by(|a, b| {
        a.priority.cmp(&b.priority).then_with(|| {
            a.days_until_stock_out
                .unwrap_or(i64::MAX)
                .cmp(&b.days_until_stock_out.unwrap_or(i64::MAX))
        })
    });

    recommendations
}

fn classify_stock(product: &Product, forecasted_demand: f64) -> StockStatus {
    if product.stock <= product.reorder_level {
        StockStatus::Critical
    } else if forecasted_demand > product.stock as f64 {
        StockStatus::Warning
    } else if product.stock > product.reorder_level * EXCESS_STOCK_FACTOR {
        StockStatus::Excess
    } else {
        StockStatus::Normal
    }
}

/// Produces a demand forecast for every product, unsorted.
///
/// Callers filter and order the result as needed.
pub fn detailed_forecasts(
    products: &[Product],
    sales: &[Sale],
    as_of: NaiveDate,
    method: ForecastMethod,
    period: u32,
    options: &ForecastOptions,
) -> Vec<DetailedForecast> {
    products
        .iter()
        .map(|product| {
            let series = DailySeries::build(sales, &product.id, as_of, DEFAULT_WINDOW_DAYS);
            let avg_daily_sales = series.mean();

            let daily_forecasts = generate_forecast(series.values(), method, period, options);
            let forecasted_demand: f64 = daily_forecasts.iter().sum();

            DetailedForecast {
                avg_daily_sales,
                forecast_period: period,
                forecasted_demand,
                stock_status: classify_stock(product, forecasted_demand),
                days_until_stock_out: days_until_stock_out(product.stock, avg_daily_sales),
                daily_forecasts,
                product: product.clone(),
            }
        })
        .collect()
}

/// Aggregates one forecast run into headline numbers.
///
/// Confidence is scored per product as how closely the forecasted demand
/// tracks the run-rate trend (average daily sales × horizon), averaged over
/// products with any sales history.
pub fn forecast_summary(
    recommendations: &[RestockRecommendation],
    forecasts: &[DetailedForecast],
    period: u32,
) -> ForecastSummary {
    let predicted_sales_value: Decimal = forecasts
        .iter()
        .map(|f| {
            Decimal::from_f64(f.forecasted_demand).unwrap_or_default() * f.product.price
        })
        .sum();

    let stock_out_risk = forecasts
        .iter()
        .filter(|f| {
            f.stock_status == StockStatus::Critical
                || f.days_until_stock_out
                    .is_some_and(|days| days <= period as i64)
        })
        .count();

    let mut total_confidence = 0.0;
    let mut scored = 0usize;
    for forecast in forecasts.iter().filter(|f| f.avg_daily_sales > 0.0) {
        let trend = forecast.avg_daily_sales * forecast.forecast_period as f64;
        let deviation = (forecast.forecasted_demand - trend).abs();
        total_confidence += (100.0 - deviation / trend * 100.0).max(0.0);
        scored += 1;
    }
    let forecast_accuracy = if scored > 0 {
        total_confidence / scored as f64
    } else {
        FALLBACK_CONFIDENCE
    };

    ForecastSummary {
        restock_count: recommendations.len(),
        predicted_sales_value,
        stock_out_risk,
        forecast_accuracy,
    }
}
