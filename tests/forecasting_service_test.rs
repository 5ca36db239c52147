//! End-to-end tests for the forecasting and analytics services over
//! in-memory snapshots.
//!
//! Tests cover the full journey:
//! - Snapshot fetch and boundary validation
//! - Restock recommendation ranking
//! - Detailed forecasts across every method
//! - Forecast summary aggregation
//! - Dashboard metrics and sales reports

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use inventory_forecast::models::{
    ForecastMethod, Product, RestockPriority, Sale, StockStatus,
};
use inventory_forecast::services::{AnalyticsService, ForecastingService};
use inventory_forecast::sources::InMemorySnapshot;
use inventory_forecast::ForecastError;

fn product(id: &str, name: &str, stock: i32, reorder_level: i32, price: Decimal) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        category: "General".into(),
        price,
        stock,
        reorder_level,
    }
}

/// One sale of `per_day` units on each of the trailing `days` days.
fn steady_sales(product_id: &str, days: i64, per_day: i32, unit_price: Decimal) -> Vec<Sale> {
    let now = Utc::now();
    (0..days)
        .map(|offset| Sale {
            id: format!("sale-{}-{}", product_id, offset),
            product_id: product_id.into(),
            quantity: per_day,
            unit_price,
            total_amount: unit_price * Decimal::from(per_day),
            date: (now - Duration::days(offset)).into(),
        })
        .collect()
}

fn seeded_service() -> ForecastingService {
    // "urgent" dries up in 4 days, "steady" in 25, "comfortable" never.
    let products = vec![
        product("urgent", "Batteries", 20, 5, dec!(3.50)),
        product("steady", "Notebooks", 75, 10, dec!(2.00)),
        product("comfortable", "Staplers", 500, 10, dec!(8.00)),
    ];
    let mut sales = steady_sales("urgent", 30, 5, dec!(3.50));
    sales.extend(steady_sales("steady", 30, 3, dec!(2.00)));
    let snapshot = Arc::new(InMemorySnapshot::new(products, sales));
    ForecastingService::new(snapshot.clone(), snapshot)
}

#[tokio::test]
async fn recommendations_rank_most_urgent_first() {
    let service = seeded_service();
    let recommendations = service.restock_recommendations(30).await.unwrap();

    let ids: Vec<&str> = recommendations
        .iter()
        .map(|r| r.product.id.as_str())
        .collect();
    assert_eq!(ids, vec!["urgent", "steady"]);
    assert_eq!(recommendations[0].priority, RestockPriority::High);
    assert_eq!(recommendations[0].days_until_stock_out, Some(4));
    assert!(recommendations[0].recommended_order > 0);
    assert_eq!(recommendations[1].priority, RestockPriority::Low);
}

#[tokio::test]
async fn well_stocked_products_are_not_recommended() {
    let service = seeded_service();
    let recommendations = service.restock_recommendations(30).await.unwrap();
    assert!(recommendations
        .iter()
        .all(|r| r.product.id != "comfortable"));
}

#[tokio::test]
async fn every_method_forecasts_every_product() {
    let service = seeded_service();
    for method in [
        ForecastMethod::MovingAverage,
        ForecastMethod::LinearRegression,
        ForecastMethod::ExponentialSmoothing,
    ] {
        let forecasts = service.detailed_forecasts(method, 14).await.unwrap();
        assert_eq!(forecasts.len(), 3);
        for forecast in &forecasts {
            assert_eq!(forecast.daily_forecasts.len(), 14);
            assert!(forecast.forecasted_demand >= 0.0);
            assert_eq!(
                forecast.forecasted_demand,
                forecast.daily_forecasts.iter().sum::<f64>()
            );
        }
    }
}

#[tokio::test]
async fn steady_demand_forecast_tracks_run_rate() {
    let service = seeded_service();
    let forecasts = service
        .detailed_forecasts(ForecastMethod::MovingAverage, 30)
        .await
        .unwrap();
    let urgent = forecasts
        .iter()
        .find(|f| f.product.id == "urgent")
        .unwrap();
    // 5/day for 30 days against 20 on hand.
    assert!((urgent.avg_daily_sales - 5.0).abs() < 1e-9);
    assert!((urgent.forecasted_demand - 150.0).abs() < 1e-6);
    assert_eq!(urgent.stock_status, StockStatus::Warning);
    assert_eq!(urgent.days_until_stock_out, Some(4));
}

#[tokio::test]
async fn summary_aggregates_the_run() {
    let service = seeded_service();
    let summary = service
        .forecast_summary(ForecastMethod::MovingAverage, 30)
        .await
        .unwrap();
    assert_eq!(summary.restock_count, 2);
    // urgent and steady both dry up inside 30 days.
    assert_eq!(summary.stock_out_risk, 2);
    assert!(summary.predicted_sales_value > Decimal::ZERO);
    assert!(summary.forecast_accuracy > 0.0 && summary.forecast_accuracy <= 100.0);
}

#[tokio::test]
async fn unknown_method_names_fail_at_the_boundary() {
    let err = ForecastMethod::parse("prophet").unwrap_err();
    assert!(matches!(err, ForecastError::UnknownMethod(name) if name == "prophet"));
}

#[tokio::test]
async fn dashboard_reflects_the_snapshot() {
    let products = vec![
        product("p1", "Batteries", 2, 5, dec!(3.50)),
        product("p2", "Staplers", 50, 5, dec!(8.00)),
    ];
    let sales = steady_sales("p1", 3, 2, dec!(3.50));
    let snapshot = Arc::new(InMemorySnapshot::new(products, sales));
    let analytics = AnalyticsService::new(snapshot.clone(), snapshot);

    let metrics = analytics.dashboard_metrics().await.unwrap();
    assert_eq!(metrics.total_products, 2);
    assert_eq!(metrics.total_stock, 52);
    assert_eq!(metrics.low_stock_items, 1);
    assert_eq!(metrics.total_revenue, dec!(21.00));
    assert_eq!(metrics.daily_revenue.len(), 7);
    let trailing: Decimal = metrics.daily_revenue.iter().map(|d| d.revenue).sum();
    assert_eq!(trailing, dec!(21.00));
}

#[tokio::test]
async fn report_covers_the_requested_range() {
    let products = vec![product("p1", "Batteries", 20, 5, dec!(3.50))];
    let sales = steady_sales("p1", 10, 2, dec!(3.50));
    let snapshot = Arc::new(InMemorySnapshot::new(products, sales));
    let analytics = AnalyticsService::new(snapshot.clone(), snapshot);

    let today = Utc::now().date_naive();
    let report = analytics
        .sales_report(today - Duration::days(4), today)
        .await
        .unwrap();
    // 5 of the 10 sale days fall inside the range.
    assert_eq!(report.summary.total_units_sold, 10);
    assert_eq!(report.summary.total_revenue, dec!(35.00));
    assert_eq!(report.by_product.len(), 1);
    assert_eq!(report.by_product[0].sales_count, 5);
    assert_eq!(report.inventory.len(), 1);
}
