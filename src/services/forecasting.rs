use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use crate::errors::ForecastError;
use crate::forecasting::{self, ForecastOptions};
use crate::models::{
    DetailedForecast, ForecastMethod, ForecastSummary, Product, RestockRecommendation, Sale,
};
use crate::sources::{ProductSource, SaleSource};

/// Service running the forecasting engine over collaborator snapshots.
///
/// Fetches products and sales, validates them at the boundary, fixes the
/// reference date once per call, and hands everything to the pure engine.
/// Holds no state between calls.
#[derive(Clone)]
pub struct ForecastingService {
    products: Arc<dyn ProductSource>,
    sales: Arc<dyn SaleSource>,
    options: ForecastOptions,
}

impl ForecastingService {
    pub fn new(products: Arc<dyn ProductSource>, sales: Arc<dyn SaleSource>) -> Self {
        Self::with_options(products, sales, ForecastOptions::default())
    }

    pub fn with_options(
        products: Arc<dyn ProductSource>,
        sales: Arc<dyn SaleSource>,
        options: ForecastOptions,
    ) -> Self {
        Self {
            products,
            sales,
            options,
        }
    }

    /// Ranked restock recommendations for the coming `forecast_period` days.
    #[instrument(skip(self))]
    pub async fn restock_recommendations(
        &self,
        forecast_period: u32,
    ) -> Result<Vec<RestockRecommendation>, ForecastError> {
        validate_period(forecast_period)?;
        let (products, sales) = self.snapshot().await?;
        let recommendations = forecasting::restock_recommendations(
            &products,
            &sales,
            Utc::now().date_naive(),
            forecast_period,
        );
        info!(
            products = products.len(),
            recommendations = recommendations.len(),
            "Generated restock recommendations"
        );
        Ok(recommendations)
    }

    /// A demand forecast for every product over `period` days.
    #[instrument(skip(self))]
    pub async fn detailed_forecasts(
        &self,
        method: ForecastMethod,
        period: u32,
    ) -> Result<Vec<DetailedForecast>, ForecastError> {
        validate_period(period)?;
        let (products, sales) = self.snapshot().await?;
        let forecasts = forecasting::detailed_forecasts(
            &products,
            &sales,
            Utc::now().date_naive(),
            method,
            period,
            &self.options,
        );
        info!(
            %method,
            period,
            forecasts = forecasts.len(),
            "Generated detailed forecasts"
        );
        Ok(forecasts)
    }

    /// Headline numbers for one forecast run.
    #[instrument(skip(self))]
    pub async fn forecast_summary(
        &self,
        method: ForecastMethod,
        period: u32,
    ) -> Result<ForecastSummary, ForecastError> {
        validate_period(period)?;
        let (products, sales) = self.snapshot().await?;
        let as_of = Utc::now().date_naive();
        let recommendations =
            forecasting::restock_recommendations(&products, &sales, as_of, period);
        let forecasts =
            forecasting::detailed_forecasts(&products, &sales, as_of, method, period, &self.options);
        Ok(forecasting::forecast_summary(
            &recommendations,
            &forecasts,
            period,
        ))
    }

    async fn snapshot(&self) -> Result<(Vec<Product>, Vec<Sale>), ForecastError> {
        let products = self.products.fetch_products().await?;
        let sales = self.sales.fetch_sales().await?;
        for product in &products {
            product.validate()?;
        }
        for sale in &sales {
            sale.validate()?;
        }
        Ok((products, sales))
    }
}

fn validate_period(period: u32) -> Result<(), ForecastError> {
    if period == 0 {
        return Err(ForecastError::ValidationError(
            "forecast period must be at least one day".into(),
        ));
    }
    Ok(())
}
