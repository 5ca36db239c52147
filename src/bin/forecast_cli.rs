//! Command-line front end for the forecasting engine.
//!
//! Reads product and sale snapshots from JSON files (paths from
//! configuration, overridable per invocation) and prints recommendations,
//! forecasts, and reports.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use inventory_forecast::config;
use inventory_forecast::models::ForecastMethod;
use inventory_forecast::services::{AnalyticsService, ForecastingService};
use inventory_forecast::sources::JsonFileSource;

#[derive(Parser)]
#[command(
    name = "forecast-cli",
    about = "Demand forecasting and restock planning over inventory snapshots",
    version
)]
struct Cli {
    /// Product snapshot file (overrides configuration)
    #[arg(long, global = true)]
    products: Option<PathBuf>,

    /// Sale snapshot file (overrides configuration)
    #[arg(long, global = true)]
    sales: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank products that need restocking within the horizon
    Restock {
        /// Forecast horizon in days
        #[arg(long)]
        period: Option<u32>,
    },
    /// Forecast demand per product
    Forecast {
        /// Forecasting method: moving_average, linear_regression,
        /// exponential_smoothing
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        period: Option<u32>,
    },
    /// Headline numbers for one forecast run
    Summary {
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        period: Option<u32>,
    },
    /// Current inventory position and the trailing week of revenue
    Dashboard,
    /// Sales report over an inclusive date range (YYYY-MM-DD)
    Report {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let products_path = cli
        .products
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.products_path));
    let sales_path = cli
        .sales
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.sales_path));
    let source = Arc::new(JsonFileSource::new(products_path, sales_path));

    let forecasting =
        ForecastingService::with_options(source.clone(), source.clone(), cfg.forecast_options());
    let analytics = AnalyticsService::new(source.clone(), source);

    match cli.command {
        Commands::Restock { period } => {
            let period = period.unwrap_or(cfg.forecast_period);
            let recommendations = forecasting.restock_recommendations(period).await?;
            if cli.json {
                print_json(&recommendations)?;
            } else if recommendations.is_empty() {
                println!("No restock recommendations");
            } else {
                for rec in &recommendations {
                    println!(
                        "[{:?}] {} — stock {}, order {}, stock-out {}",
                        rec.priority,
                        rec.product.name,
                        rec.current_stock,
                        rec.recommended_order,
                        rec.days_until_stock_out
                            .map(|d| format!("in {} days", d))
                            .unwrap_or_else(|| "not projected".to_string()),
                    );
                }
            }
        }
        Commands::Forecast { method, period } => {
            let method = resolve_method(&cfg, method)?;
            let period = period.unwrap_or(cfg.forecast_period);
            let forecasts = forecasting.detailed_forecasts(method, period).await?;
            if cli.json {
                print_json(&forecasts)?;
            } else {
                for forecast in &forecasts {
                    println!(
                        "{} [{}] — avg {:.2}/day, {} days ≈ {:.1} units",
                        forecast.product.name,
                        forecast.stock_status,
                        forecast.avg_daily_sales,
                        forecast.forecast_period,
                        forecast.forecasted_demand,
                    );
                }
            }
        }
        Commands::Summary { method, period } => {
            let method = resolve_method(&cfg, method)?;
            let period = period.unwrap_or(cfg.forecast_period);
            let summary = forecasting.forecast_summary(method, period).await?;
            if cli.json {
                print_json(&summary)?;
            } else {
                println!("Products to restock: {}", summary.restock_count);
                println!("Predicted sales value: {}", summary.predicted_sales_value);
                println!("Stock-out risk: {}", summary.stock_out_risk);
                println!("Forecast confidence: {:.1}%", summary.forecast_accuracy);
            }
        }
        Commands::Dashboard => {
            let metrics = analytics.dashboard_metrics().await?;
            if cli.json {
                print_json(&metrics)?;
            } else {
                println!("Products: {}", metrics.total_products);
                println!("Units on hand: {}", metrics.total_stock);
                println!("Low stock items: {}", metrics.low_stock_items);
                println!("Total revenue: {}", metrics.total_revenue);
            }
        }
        Commands::Report { from, to } => {
            let report = analytics.sales_report(from, to).await?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("Report {} — {}", report.from, report.to);
                println!("Revenue: {}", report.summary.total_revenue);
                println!("Units sold: {}", report.summary.total_units_sold);
                println!("Average order value: {}", report.summary.average_order_value);
                println!("Inventory value: {}", report.summary.inventory_value);
                for row in &report.by_product {
                    println!(
                        "  {} ({}) — {} units, revenue {}",
                        row.name, row.category, row.units_sold, row.revenue
                    );
                }
            }
        }
    }

    Ok(())
}

fn resolve_method(
    cfg: &inventory_forecast::config::AppConfig,
    method: Option<String>,
) -> Result<ForecastMethod> {
    match method {
        Some(name) => Ok(ForecastMethod::parse(&name)?),
        None => Ok(cfg.forecast_method()?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
