use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::ForecastError;
use crate::models::{Product, Sale};
use crate::sources::{ProductSource, SaleSource};

/// Label used when a sale references a product no longer in the store.
const UNKNOWN_PRODUCT: &str = "Unknown Product";
const UNKNOWN_CATEGORY: &str = "Unknown";
/// Days covered by the dashboard revenue trend.
const REVENUE_TREND_DAYS: i64 = 7;
/// Stock above reorder_level × this factor counts as excess.
const EXCESS_STOCK_FACTOR: i32 = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStock {
    pub category: String,
    pub total_stock: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// Headline inventory and sales numbers for the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_products: usize,
    pub total_stock: i64,
    pub low_stock_items: usize,
    pub total_revenue: Decimal,
    pub stock_by_category: Vec<CategoryStock>,
    /// Revenue per day over the trailing week, oldest first
    pub daily_revenue: Vec<DailyRevenue>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_revenue: Decimal,
    pub total_units_sold: i64,
    pub average_order_value: Decimal,
    /// Current stock priced at current product prices
    pub inventory_value: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesRow {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub units_sold: i64,
    pub revenue: Decimal,
    pub sales_count: usize,
    pub average_price: Decimal,
    pub stock: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySalesRow {
    pub category: String,
    pub product_count: usize,
    pub units_sold: i64,
    pub revenue: Decimal,
    /// Share of total revenue, percent
    pub revenue_share: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    Low,
    Excess,
    Normal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStatusRow {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub stock: i32,
    pub reorder_level: i32,
    pub stock_value: Decimal,
    pub status: InventoryStatus,
}

/// Sales and inventory report over an inclusive date range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub summary: ReportSummary,
    /// Per-product sales, highest revenue first
    pub by_product: Vec<ProductSalesRow>,
    /// Per-category sales, highest revenue first
    pub by_category: Vec<CategorySalesRow>,
    /// Every product's stock position, by name
    pub inventory: Vec<InventoryStatusRow>,
}

/// Analytics service for dashboard metrics and sales reports.
#[derive(Clone)]
pub struct AnalyticsService {
    products: Arc<dyn ProductSource>,
    sales: Arc<dyn SaleSource>,
}

impl AnalyticsService {
    pub fn new(products: Arc<dyn ProductSource>, sales: Arc<dyn SaleSource>) -> Self {
        Self { products, sales }
    }

    /// Current inventory position and the trailing week of revenue.
    #[instrument(skip(self))]
    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics, ForecastError> {
        info!("Generating dashboard metrics");
        let products = self.products.fetch_products().await?;
        let sales = self.sales.fetch_sales().await?;
        let today = Utc::now().date_naive();

        let total_stock: i64 = products.iter().map(|p| p.stock as i64).sum();
        let low_stock_items = products
            .iter()
            .filter(|p| p.stock <= p.reorder_level)
            .count();
        let total_revenue: Decimal = sales.iter().map(|s| s.total_amount).sum();

        let mut by_category: BTreeMap<String, i64> = BTreeMap::new();
        for product in &products {
            *by_category.entry(product.category.clone()).or_default() += product.stock as i64;
        }
        let mut stock_by_category: Vec<CategoryStock> = by_category
            .into_iter()
            .map(|(category, total_stock)| CategoryStock {
                category,
                total_stock,
            })
            .collect();
        stock_by_category.sort_by(|a, b| b.total_stock.cmp(&a.total_stock));

        Ok(DashboardMetrics {
            total_products: products.len(),
            total_stock,
            low_stock_items,
            total_revenue,
            stock_by_category,
            daily_revenue: daily_revenue(&sales, today - Duration::days(REVENUE_TREND_DAYS - 1), today),
            generated_at: Utc::now(),
        })
    }

    /// Builds a sales report for the inclusive `[from, to]` range.
    #[instrument(skip(self))]
    pub async fn sales_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SalesReport, ForecastError> {
        if from > to {
            return Err(ForecastError::ValidationError(
                "report range start must not be after its end".into(),
            ));
        }

        let products = self.products.fetch_products().await?;
        let sales = self.sales.fetch_sales().await?;
        let in_range: Vec<&Sale> = sales
            .iter()
            .filter(|s| {
                let day = s.sale_date();
                day >= from && day <= to
            })
            .collect();
        info!(sales = in_range.len(), "Generating sales report");

        let by_id: HashMap<&str, &Product> =
            products.iter().map(|p| (p.id.as_str(), p)).collect();

        let summary = report_summary(&products, &in_range);
        let by_product = sales_by_product(&by_id, &in_range);
        let by_category = sales_by_category(&by_id, &in_range);
        let inventory = inventory_status(&products);

        Ok(SalesReport {
            from,
            to,
            summary,
            by_product,
            by_category,
            inventory,
        })
    }
}

fn daily_revenue(sales: &[Sale], from: NaiveDate, to: NaiveDate) -> Vec<DailyRevenue> {
    let days = (to - from).num_days() + 1;
    let mut buckets: Vec<DailyRevenue> = (0..days)
        .map(|offset| DailyRevenue {
            date: from + Duration::days(offset),
            revenue: Decimal::ZERO,
        })
        .collect();
    for sale in sales {
        let day = sale.sale_date();
        if day < from || day > to {
            continue;
        }
        let idx = (day - from).num_days() as usize;
        buckets[idx].revenue += sale.total_amount;
    }
    buckets
}

fn report_summary(products: &[Product], sales: &[&Sale]) -> ReportSummary {
    let total_revenue: Decimal = sales.iter().map(|s| s.total_amount).sum();
    let total_units_sold: i64 = sales.iter().map(|s| s.quantity as i64).sum();
    let average_order_value = if sales.is_empty() {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(sales.len())
    };
    let inventory_value: Decimal = products
        .iter()
        .map(|p| p.price * Decimal::from(p.stock))
        .sum();
    ReportSummary {
        total_revenue,
        total_units_sold,
        average_order_value,
        inventory_value,
    }
}

fn sales_by_product(
    products: &HashMap<&str, &Product>,
    sales: &[&Sale],
) -> Vec<ProductSalesRow> {
    struct Accumulator {
        units_sold: i64,
        revenue: Decimal,
        sales_count: usize,
    }

    let mut grouped: HashMap<&str, Accumulator> = HashMap::new();
    for sale in sales {
        let entry = grouped
            .entry(sale.product_id.as_str())
            .or_insert(Accumulator {
                units_sold: 0,
                revenue: Decimal::ZERO,
                sales_count: 0,
            });
        entry.units_sold += sale.quantity as i64;
        entry.revenue += sale.total_amount;
        entry.sales_count += 1;
    }

    let mut rows: Vec<ProductSalesRow> = grouped
        .into_iter()
        .map(|(product_id, acc)| {
            let product = products.get(product_id);
            let average_price = if acc.units_sold > 0 {
                acc.revenue / Decimal::from(acc.units_sold)
            } else {
                Decimal::ZERO
            };
            ProductSalesRow {
                product_id: product_id.to_string(),
                name: product
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                category: product
                    .map(|p| p.category.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                units_sold: acc.units_sold,
                revenue: acc.revenue,
                sales_count: acc.sales_count,
                average_price,
                stock: product.map(|p| p.stock).unwrap_or(0),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    rows
}

fn sales_by_category(
    products: &HashMap<&str, &Product>,
    sales: &[&Sale],
) -> Vec<CategorySalesRow> {
    struct Accumulator {
        product_ids: HashSet<String>,
        units_sold: i64,
        revenue: Decimal,
    }

    let mut grouped: HashMap<String, Accumulator> = HashMap::new();
    for sale in sales {
        let product = products.get(sale.product_id.as_str());
        let category = product
            .map(|p| p.category.clone())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
        let entry = grouped.entry(category).or_insert(Accumulator {
            product_ids: HashSet::new(),
            units_sold: 0,
            revenue: Decimal::ZERO,
        });
        if let Some(product) = product {
            entry.product_ids.insert(product.id.clone());
        }
        entry.units_sold += sale.quantity as i64;
        entry.revenue += sale.total_amount;
    }

    let total_revenue: Decimal = grouped.values().map(|acc| acc.revenue).sum();
    let mut rows: Vec<CategorySalesRow> = grouped
        .into_iter()
        .map(|(category, acc)| {
            let revenue_share = if total_revenue > Decimal::ZERO {
                (acc.revenue / total_revenue * Decimal::from(100))
                    .to_f64()
                    .unwrap_or(0.0)
            } else {
                0.0
            };
            CategorySalesRow {
                category,
                product_count: acc.product_ids.len(),
                units_sold: acc.units_sold,
                revenue: acc.revenue,
                revenue_share,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

fn inventory_status(products: &[Product]) -> Vec<InventoryStatusRow> {
    let mut rows: Vec<InventoryStatusRow> = products
        .iter()
        .map(|product| {
            let status = if product.stock <= product.reorder_level {
                InventoryStatus::Low
            } else if product.stock > product.reorder_level * EXCESS_STOCK_FACTOR {
                InventoryStatus::Excess
            } else {
                InventoryStatus::Normal
            };
            InventoryStatusRow {
                product_id: product.id.clone(),
                name: product.name.clone(),
                category: product.category.clone(),
                stock: product.stock,
                reorder_level: product.reorder_level,
                stock_value: product.price * Decimal::from(product.stock),
                status,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}
