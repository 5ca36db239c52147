use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::errors::ForecastError;
use crate::forecasting::ForecastOptions;
use crate::models::forecast::ForecastMethod;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_PRODUCTS_PATH: &str = "data/products.json";
const DEFAULT_SALES_PATH: &str = "data/sales.json";
const DEFAULT_FORECAST_PERIOD: u32 = 30;
const DEFAULT_FORECAST_METHOD: &str = "moving_average";
const DEFAULT_SMOOTHING_WINDOW: usize = 7;
const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application environment
    #[serde(default = "default_env")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Path to the product snapshot file consumed by the CLI
    #[serde(default = "default_products_path")]
    pub products_path: String,

    /// Path to the sale snapshot file consumed by the CLI
    #[serde(default = "default_sales_path")]
    pub sales_path: String,

    /// Default forecast horizon in days
    #[serde(default = "default_forecast_period")]
    #[validate(range(min = 1, max = 365))]
    pub forecast_period: u32,

    /// Default forecasting method name (snake_case)
    #[serde(default = "default_forecast_method")]
    pub forecast_method: String,

    /// Moving-average window in days
    #[serde(default = "default_smoothing_window")]
    #[validate(custom = "validate_window")]
    pub smoothing_window: usize,

    /// Exponential-smoothing factor, in (0, 1]
    #[serde(default = "default_smoothing_alpha")]
    #[validate(custom = "validate_alpha")]
    pub smoothing_alpha: f64,
}

fn default_env() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_products_path() -> String {
    DEFAULT_PRODUCTS_PATH.to_string()
}

fn default_sales_path() -> String {
    DEFAULT_SALES_PATH.to_string()
}

fn default_forecast_period() -> u32 {
    DEFAULT_FORECAST_PERIOD
}

fn default_forecast_method() -> String {
    DEFAULT_FORECAST_METHOD.to_string()
}

fn default_smoothing_window() -> usize {
    DEFAULT_SMOOTHING_WINDOW
}

fn default_smoothing_alpha() -> f64 {
    DEFAULT_SMOOTHING_ALPHA
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => {
            let mut err = ValidationError::new("log_level");
            err.message = Some("log_level must be one of trace, debug, info, warn, error".into());
            Err(err)
        }
    }
}

fn validate_window(window: usize) -> Result<(), ValidationError> {
    if window == 0 {
        let mut err = ValidationError::new("smoothing_window");
        err.message = Some("smoothing_window must be at least one day".into());
        return Err(err);
    }
    Ok(())
}

fn validate_alpha(alpha: f64) -> Result<(), ValidationError> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("smoothing_alpha");
        err.message = Some("smoothing_alpha must be in (0, 1]".into());
        Err(err)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_env(),
            log_level: default_log_level(),
            log_json: false,
            products_path: default_products_path(),
            sales_path: default_sales_path(),
            forecast_period: default_forecast_period(),
            forecast_method: default_forecast_method(),
            smoothing_window: default_smoothing_window(),
            smoothing_alpha: default_smoothing_alpha(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Engine options derived from the configured smoothing parameters.
    pub fn forecast_options(&self) -> ForecastOptions {
        ForecastOptions {
            window_size: self.smoothing_window,
            alpha: self.smoothing_alpha,
        }
    }

    /// Parses the configured default method, rejecting unknown names.
    pub fn forecast_method(&self) -> Result<ForecastMethod, ForecastError> {
        ForecastMethod::parse(&self.forecast_method)
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set and non-empty.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("inventory_forecast={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (FORECAST_*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("products_path", DEFAULT_PRODUCTS_PATH)?
        .set_default("sales_path", DEFAULT_SALES_PATH)?
        .set_default("forecast_period", DEFAULT_FORECAST_PERIOD as i64)?
        .set_default("forecast_method", DEFAULT_FORECAST_METHOD)?
        .set_default("smoothing_window", DEFAULT_SMOOTHING_WINDOW as i64)?
        .set_default("smoothing_alpha", DEFAULT_SMOOTHING_ALPHA)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("FORECAST").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
