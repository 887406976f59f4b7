//! The generic forecast pipeline
//!
//! One pipeline serves every domain: grid-search ARIMA, fall back to
//! Holt-Winters when no candidate is viable, clamp to the domain range,
//! then classify. Weather and market differ only in their [`DomainConfig`]
//! (horizon, grid bounds, clamps, thresholds), not in control flow.

use crate::algorithms::arima::Arima;
use crate::algorithms::holt_winters::HoltWinters;
use crate::algorithms::Predictor;
use crate::classify::{
    classify_trend, representative, Trend, DEFAULT_PERCENT_THRESHOLD, DEFAULT_REPRESENTATIVE_INDEX,
    DEFAULT_SLOPE_THRESHOLD,
};
use crate::error::{ForecastError, Result};
use crate::selection::{ArimaSelector, GridBounds};
use crate::utils::check_finite;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which model family produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Arima,
    HoltWinters,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModelKind::Arima => "arima",
            ModelKind::HoltWinters => "holt-winters",
        };
        f.write_str(label)
    }
}

/// A fitted forecaster: either the selected ARIMA model or the
/// Holt-Winters fallback
///
/// The two strategies are mutually exclusive alternatives of one concept,
/// so they form a sum type rather than a trait object; match sites handle
/// both variants exhaustively.
#[derive(Debug, Clone)]
pub enum Forecaster {
    Arima(Arima),
    HoltWinters(HoltWinters),
}

impl Forecaster {
    /// Predict `horizon` future values
    pub fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        match self {
            Forecaster::Arima(model) => model.predict(horizon),
            Forecaster::HoltWinters(model) => model.predict(horizon),
        }
    }

    /// Which family this forecaster belongs to
    pub fn kind(&self) -> ModelKind {
        match self {
            Forecaster::Arima(_) => ModelKind::Arima,
            Forecaster::HoltWinters(_) => ModelKind::HoltWinters,
        }
    }
}

/// Per-domain pipeline parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Number of steps to forecast
    pub horizon: usize,
    /// ARIMA search grid
    pub grid: GridBounds,
    /// Holt-Winters season length
    pub season_length: usize,
    /// Lower clamp applied to forecast values
    pub clamp_min: Option<f64>,
    /// Upper clamp applied to forecast values
    pub clamp_max: Option<f64>,
    /// Forecast index reported as the representative value
    pub representative_index: usize,
    /// Regression slope magnitude below which the trend is stable
    pub slope_threshold: f64,
    /// Percent-change threshold of the endpoint fallback
    pub percent_threshold: f64,
}

impl DomainConfig {
    /// Weather configuration: 7-day horizon, full (2,1,2) grid, the first
    /// forecast day as the representative value. Clamps are per-series
    /// (temperature vs rainfall) and set by the caller.
    pub fn weather() -> Self {
        Self {
            horizon: 7,
            grid: GridBounds::new(2, 1, 2),
            season_length: 7,
            clamp_min: None,
            clamp_max: None,
            representative_index: 0,
            slope_threshold: DEFAULT_SLOPE_THRESHOLD,
            percent_threshold: DEFAULT_PERCENT_THRESHOLD,
        }
    }

    /// Market configuration: 14-day horizon, narrow (1,1,1) grid to bound
    /// the per-crop cost, day 7 as the representative value.
    pub fn market() -> Self {
        Self {
            horizon: 14,
            grid: GridBounds::new(1, 1, 1),
            season_length: 7,
            clamp_min: None,
            clamp_max: None,
            representative_index: DEFAULT_REPRESENTATIVE_INDEX,
            slope_threshold: DEFAULT_SLOPE_THRESHOLD,
            percent_threshold: DEFAULT_PERCENT_THRESHOLD,
        }
    }

    /// Generic configuration for caller-supplied series
    pub fn generic(horizon: usize) -> Self {
        Self {
            horizon,
            representative_index: DEFAULT_REPRESENTATIVE_INDEX.min(horizon.saturating_sub(1)),
            ..Self::weather()
        }
    }

    /// Set the clamp range
    pub fn with_clamp(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.clamp_min = min;
        self.clamp_max = max;
        self
    }

    /// Set the representative forecast index
    pub fn with_representative_index(mut self, index: usize) -> Self {
        self.representative_index = index;
        self
    }

    /// Set the Holt-Winters season length
    pub fn with_season_length(mut self, season_length: usize) -> Self {
        self.season_length = season_length;
        self
    }

    fn clamp(&self, value: f64) -> f64 {
        let mut v = value;
        if let Some(min) = self.clamp_min {
            v = v.max(min);
        }
        if let Some(max) = self.clamp_max {
            v = v.min(max);
        }
        v
    }
}

/// Forecast of one series, after clamping and classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesForecast {
    /// Model family that produced the values
    pub model: ModelKind,
    /// Forecast values, one per horizon step
    pub values: Vec<f64>,
    /// Representative scalar for the forecast
    pub representative: f64,
    /// Direction over the horizon
    pub trend: Trend,
}

/// The select-fallback-classify pipeline for one domain
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: DomainConfig,
}

impl ForecastPipeline {
    /// Validate the configuration and build a pipeline
    pub fn new(config: DomainConfig) -> Result<Self> {
        if config.horizon == 0 {
            return Err(ForecastError::invalid_parameter(
                "horizon",
                "must be positive",
            ));
        }
        if config.season_length < 2 {
            return Err(ForecastError::invalid_parameter(
                "season_length",
                "must be at least 2",
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &DomainConfig {
        &self.config
    }

    /// Run the full pipeline on a historical series
    ///
    /// ARIMA failures never surface: when no grid candidate fits, or the
    /// selected model cannot predict, the Holt-Winters fallback takes over.
    /// Only programmer errors (empty or non-finite input) are returned.
    pub fn run(&self, series: &[f64]) -> Result<SeriesForecast> {
        if series.is_empty() {
            return Err(ForecastError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        check_finite(series)?;

        let forecaster = match ArimaSelector::new(self.config.grid).select(series) {
            Some(model) => Forecaster::Arima(model),
            None => {
                tracing::debug!("no viable arima candidate, using holt-winters");
                Forecaster::HoltWinters(self.fit_fallback(series)?)
            }
        };

        let (model, raw) = match &forecaster {
            Forecaster::Arima(arima) => match arima.predict(self.config.horizon) {
                Ok(values) => (ModelKind::Arima, values),
                Err(err) => {
                    tracing::debug!(%err, "arima prediction failed, using holt-winters");
                    let fallback = self.fit_fallback(series)?;
                    (ModelKind::HoltWinters, fallback.predict(self.config.horizon)?)
                }
            },
            Forecaster::HoltWinters(hw) => {
                (ModelKind::HoltWinters, hw.predict(self.config.horizon)?)
            }
        };

        let values: Vec<f64> = raw.iter().map(|&v| self.config.clamp(v)).collect();
        let representative = self.config.clamp(representative(
            &values,
            series,
            self.config.representative_index,
        ));
        let trend = classify_trend(
            &values,
            self.config.slope_threshold,
            self.config.percent_threshold,
        );

        Ok(SeriesForecast {
            model,
            values,
            representative,
            trend,
        })
    }

    fn fit_fallback(&self, series: &[f64]) -> Result<HoltWinters> {
        let mut model = HoltWinters::with_season(self.config.season_length);
        model.fit(series)?;
        Ok(model)
    }
}

/// Run the pipeline once over a caller-supplied series
pub fn forecast_series(series: &[f64], config: DomainConfig) -> Result<SeriesForecast> {
    ForecastPipeline::new(config)?.run(series)
}
