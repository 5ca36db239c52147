//! Read interfaces to the collaborator-owned product and sale stores.
//!
//! The engine never touches persistence; callers hand it snapshots obtained
//! through these traits. `InMemorySnapshot` serves embedding callers and
//! tests, `JsonFileSource` serves the CLI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::ForecastError;
use crate::models::{Product, Sale};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, ForecastError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaleSource: Send + Sync {
    async fn fetch_sales(&self) -> Result<Vec<Sale>, ForecastError>;
}

/// A fixed snapshot of products and sales held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemorySnapshot {
    products: Vec<Product>,
    sales: Vec<Sale>,
}

impl InMemorySnapshot {
    pub fn new(products: Vec<Product>, sales: Vec<Sale>) -> Self {
        Self { products, sales }
    }
}

#[async_trait]
impl ProductSource for InMemorySnapshot {
    async fn fetch_products(&self) -> Result<Vec<Product>, ForecastError> {
        Ok(self.products.clone())
    }
}

#[async_trait]
impl SaleSource for InMemorySnapshot {
    async fn fetch_sales(&self) -> Result<Vec<Sale>, ForecastError> {
        Ok(self.sales.clone())
    }
}

/// Reads product and sale snapshots from JSON files on each fetch.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    products_path: PathBuf,
    sales_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(products_path: impl Into<PathBuf>, sales_path: impl Into<PathBuf>) -> Self {
        Self {
            products_path: products_path.into(),
            sales_path: sales_path.into(),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        path: &Path,
    ) -> Result<T, ForecastError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ForecastError::SourceError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ProductSource for JsonFileSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, ForecastError> {
        Self::read_json(&self.products_path).await
    }
}

#[async_trait]
impl SaleSource for JsonFileSource {
    async fn fetch_sales(&self) -> Result<Vec<Sale>, ForecastError> {
        Self::read_json(&self.sales_path).await
    }
}
