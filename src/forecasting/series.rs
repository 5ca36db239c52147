use chrono::{Duration, NaiveDate};

use crate::models::Sale;

/// Daily sales totals for one product over a fixed trailing window.
///
/// Covers the `window_days` calendar days ending at `as_of` inclusive,
/// oldest first, with days that saw no sales held at zero. The length
/// always equals the requested window size.
#[derive(Clone, Debug, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailySeries {
    /// Buckets matching sales into per-day totals.
    ///
    /// Sales for other products or outside the window are ignored.
    pub fn build(sales: &[Sale], product_id: &str, as_of: NaiveDate, window_days: u32) -> Self {
        let len = window_days as usize;
        let start = as_of - Duration::days(window_days as i64 - 1);
        let mut values = vec![0.0; len];

        for sale in sales.iter().filter(|s| s.product_id == product_id) {
            let day = sale.sale_date();
            if day < start || day > as_of {
                continue;
            }
            let idx = (day - start).num_days() as usize;
            values[idx] += sale.quantity as f64;
        }

        Self { start, values }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean daily quantity over the window; zero for an empty window.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sale(product_id: &str, day: NaiveDate, quantity: i32) -> Sale {
        let ts = Utc
            .from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .into();
        Sale {
            id: format!("sale-{}-{}", product_id, day),
            product_id: product_id.into(),
            quantity,
            unit_price: dec!(10.00),
            total_amount: dec!(10.00) * Decimal::from(quantity),
            date: ts,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_sales_yield_zero_filled_window() {
        let series = DailySeries::build(&[], "prod-1", d(2026, 8, 7), 30);
        assert_eq!(series.len(), 30);
        assert!(series.values().iter().all(|&v| v == 0.0));
        assert_eq!(series.mean(), 0.0);
    }

    #[test]
    fn window_spans_requested_days_ending_at_as_of() {
        let series = DailySeries::build(&[], "prod-1", d(2026, 8, 7), 30);
        assert_eq!(series.start(), d(2026, 7, 9));
    }

    #[test]
    fn sales_accumulate_into_day_buckets() {
        let as_of = d(2026, 8, 7);
        let sales = vec![
            sale("prod-1", d(2026, 8, 7), 3),
            sale("prod-1", d(2026, 8, 7), 2),
            sale("prod-1", d(2026, 8, 1), 4),
        ];
        let series = DailySeries::build(&sales, "prod-1", as_of, 30);
        assert_eq!(series.values()[29], 5.0);
        assert_eq!(series.values()[23], 4.0);
        assert_eq!(series.values().iter().sum::<f64>(), 9.0);
    }

    #[test]
    fn other_products_and_stale_sales_excluded() {
        let as_of = d(2026, 8, 7);
        let sales = vec![
            sale("prod-2", d(2026, 8, 7), 10),
            sale("prod-1", d(2026, 6, 1), 10),
        ];
        let series = DailySeries::build(&sales, "prod-1", as_of, 30);
        assert!(series.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn epoch_wrapped_timestamps_bucket_correctly() {
        let as_of = d(2026, 8, 7);
        // 2026-08-05T00:30:00Z
        let epoch = Utc
            .from_utc_datetime(&d(2026, 8, 5).and_hms_opt(0, 30, 0).unwrap())
            .timestamp();
        let mut s = sale("prod-1", d(2026, 8, 5), 7);
        s.date = crate::models::SaleTimestamp::Epoch {
            seconds: epoch,
            nanoseconds: 0,
        };
        let series = DailySeries::build(&[s], "prod-1", as_of, 30);
        assert_eq!(series.values()[27], 7.0);
    }
}
