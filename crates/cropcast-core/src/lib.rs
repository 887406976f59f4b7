//! # cropcast-core
//!
//! Statistical forecasting core for crop planning. Generates deterministic
//! synthetic weather and market histories, fits ARIMA models via a small
//! AIC-driven grid search, falls back to Holt-Winters triple exponential
//! smoothing when no ARIMA candidate is viable, and classifies the resulting
//! forecasts into trend and demand categories.
//!
//! ## Pipeline
//!
//! For each entity (a region for weather, a crop for market):
//!
//! 1. Generate or accept a historical series
//! 2. Grid-search ARIMA orders, selecting by lowest AIC
//! 3. Fall back to Holt-Winters when every candidate fails
//! 4. Clamp forecasts to the domain-valid range
//! 5. Extract a representative value and a trend label
//!
//! Every step is pure, synchronous, and deterministic for a given seed, so
//! repeated calls with the same inputs are reproducible without persistence.
//!
//! ## Example
//!
//! ```rust
//! use cropcast_core::prelude::*;
//!
//! let outlook = predict_weather("Punjab", 60).unwrap();
//! assert!(outlook.temperature >= 15.0 && outlook.temperature <= 45.0);
//!
//! let crops = vec!["Rice".to_string(), "Wheat".to_string()];
//! let markets = predict_market(&crops, "Punjab", 90).unwrap();
//! assert_eq!(markets.len(), 2);
//! ```

pub mod algorithms;
pub mod classify;
pub mod market;
pub mod pipeline;
pub mod selection;
pub mod synthetic;
pub mod weather;

mod error;
mod utils;

pub use error::{ForecastError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::arima::Arima;
    pub use crate::algorithms::holt_winters::HoltWinters;
    pub use crate::algorithms::linear_regression::LinearRegression;
    pub use crate::algorithms::Predictor;
    pub use crate::classify::{DemandLevel, Trend};
    pub use crate::error::{ForecastError, Result};
    pub use crate::market::{predict_market, MarketOutlook};
    pub use crate::pipeline::{
        forecast_series, DomainConfig, ForecastPipeline, Forecaster, ModelKind, SeriesForecast,
    };
    pub use crate::selection::{ArimaSelector, GridBounds};
    pub use crate::synthetic::{SeededRng, SeriesParams};
    pub use crate::weather::{predict_weather, WeatherOutlook};
}
