//! Holt-Winters triple exponential smoothing
//!
//! The fallback forecaster of the pipeline: decomposes a series into level,
//! trend, and additive seasonal components with fixed smoothing constants,
//! and keeps working on inputs too short for any other model. Series
//! shorter than two full seasons skip the decomposition entirely and replay
//! their trailing observations instead, so `fit` + `predict` succeed for
//! any finite series of length >= 1.

use crate::algorithms::Predictor;
use crate::error::{ForecastError, Result};
use crate::utils::check_finite;
use serde::{Deserialize, Serialize};

/// Default smoothing constant shared by level, trend, and seasonal updates
pub const DEFAULT_SMOOTHING: f64 = 0.3;

/// Default season length, approximating weekly seasonality in daily data
pub const DEFAULT_SEASON_LENGTH: usize = 7;

/// Triple exponential smoothing with additive seasonality
///
/// # Example
///
/// ```rust
/// use cropcast_core::algorithms::{holt_winters::HoltWinters, Predictor};
///
/// let data: Vec<f64> = (0..28)
///     .map(|i| 20.0 + 3.0 * ((i as f64 / 7.0) * std::f64::consts::TAU).sin())
///     .collect();
///
/// let mut model = HoltWinters::fallback();
/// model.fit(&data).unwrap();
/// let forecast = model.predict(7).unwrap();
/// assert_eq!(forecast.len(), 7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoltWinters {
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
    /// Seasonal smoothing parameter
    gamma: f64,
    /// Seasonal period length
    season_length: usize,
    /// Current level
    level: f64,
    /// Current trend
    trend: f64,
    /// Seasonal components
    seasonal: Vec<f64>,
    /// Number of observations the model was fitted on
    n_observations: usize,
    /// Raw observations replayed when the series was too short to decompose
    passthrough: Vec<f64>,
    /// Whether model has been fitted
    fitted: bool,
}

impl HoltWinters {
    /// Create a new Holt-Winters model
    ///
    /// # Arguments
    ///
    /// * `alpha` - Level smoothing (0 < alpha < 1)
    /// * `beta` - Trend smoothing (0 < beta < 1)
    /// * `gamma` - Seasonal smoothing (0 < gamma < 1)
    /// * `season_length` - Number of observations per seasonal cycle
    pub fn new(alpha: f64, beta: f64, gamma: f64, season_length: usize) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(0.0 < value && value < 1.0) {
                return Err(ForecastError::invalid_parameter(
                    name,
                    "must be between 0 and 1 (exclusive)",
                ));
            }
        }
        if season_length < 2 {
            return Err(ForecastError::invalid_parameter(
                "season_length",
                "must be at least 2",
            ));
        }

        Ok(Self {
            alpha,
            beta,
            gamma,
            season_length,
            level: 0.0,
            trend: 0.0,
            seasonal: vec![0.0; season_length],
            n_observations: 0,
            passthrough: Vec::new(),
            fitted: false,
        })
    }

    /// The pipeline's fallback configuration: 0.3 for every smoothing
    /// constant and a weekly season.
    pub fn fallback() -> Self {
        Self::with_season(DEFAULT_SEASON_LENGTH)
    }

    /// Fallback configuration with a custom season length
    pub fn with_season(season_length: usize) -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING,
            beta: DEFAULT_SMOOTHING,
            gamma: DEFAULT_SMOOTHING,
            season_length: season_length.max(2),
            level: 0.0,
            trend: 0.0,
            seasonal: vec![0.0; season_length.max(2)],
            n_observations: 0,
            passthrough: Vec::new(),
            fitted: false,
        }
    }

    /// Whether the last fit took the short-series passthrough path
    pub fn is_degenerate(&self) -> bool {
        !self.passthrough.is_empty()
    }

    /// Get all components: (level, trend, seasonal)
    pub fn components(&self) -> (f64, f64, &[f64]) {
        (self.level, self.trend, &self.seasonal)
    }
}

impl Predictor for HoltWinters {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.is_empty() {
            return Err(ForecastError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        check_finite(data)?;

        self.n_observations = data.len();

        // Too short to decompose: replay the raw observations at predict time
        if data.len() < self.season_length * 2 {
            self.passthrough = data.to_vec();
            self.fitted = true;
            return Ok(());
        }
        self.passthrough.clear();

        // Initialize components from the first season
        self.level = data[0];
        self.trend = (data[self.season_length] - data[0]) / self.season_length as f64;
        for i in 0..self.season_length {
            self.seasonal[i] = data[i] - self.level;
        }

        // Single pass over the series
        for i in 1..data.len() {
            let season_idx = i % self.season_length;
            let prev_level = self.level;

            self.level = self.alpha * (data[i] - self.seasonal[season_idx])
                + (1.0 - self.alpha) * (self.level + self.trend);
            self.trend = self.beta * (self.level - prev_level) + (1.0 - self.beta) * self.trend;
            self.seasonal[season_idx] = self.gamma * (data[i] - self.level)
                + (1.0 - self.gamma) * self.seasonal[season_idx];
        }

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(ForecastError::NotFitted);
        }

        // Degenerate path: cycle the trailing observations to the full
        // requested length
        if !self.passthrough.is_empty() {
            let start = self.passthrough.len().saturating_sub(steps);
            let window = &self.passthrough[start..];
            return Ok((0..steps).map(|i| window[i % window.len()]).collect());
        }

        let mut forecasts = Vec::with_capacity(steps);
        for i in 0..steps {
            let season_idx = (self.n_observations + i) % self.season_length;
            forecasts.push(self.level + (i + 1) as f64 * self.trend + self.seasonal[season_idx]);
        }

        Ok(forecasts)
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                20.0 + 0.1 * i as f64 + 3.0 * ((i as f64 / 7.0) * std::f64::consts::TAU).sin()
            })
            .collect()
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(HoltWinters::new(0.0, 0.3, 0.3, 7).is_err());
        assert!(HoltWinters::new(0.3, 1.0, 0.3, 7).is_err());
        assert!(HoltWinters::new(0.3, 0.3, 0.3, 1).is_err());
    }

    #[test]
    fn test_forecast_length() {
        let data = seasonal_series(60);
        let mut model = HoltWinters::fallback();
        model.fit(&data).unwrap();
        for h in [1, 7, 14, 30] {
            assert_eq!(model.predict(h).unwrap().len(), h);
        }
    }

    #[test]
    fn test_short_series_cycles_to_full_length() {
        let data = vec![4.0, 5.0, 6.0];
        let mut model = HoltWinters::fallback();
        model.fit(&data).unwrap();
        assert!(model.is_degenerate());

        let forecast = model.predict(5).unwrap();
        assert_eq!(forecast, vec![4.0, 5.0, 6.0, 4.0, 5.0]);
    }

    #[test]
    fn test_length_one_series() {
        let mut model = HoltWinters::fallback();
        model.fit(&[42.0]).unwrap();
        assert_eq!(model.predict(4).unwrap(), vec![42.0; 4]);
    }

    #[test]
    fn test_constant_zero_series() {
        let data = vec![0.0; 30];
        let mut model = HoltWinters::fallback();
        model.fit(&data).unwrap();
        let forecast = model.predict(7).unwrap();
        assert_eq!(forecast.len(), 7);
        assert!(forecast.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_tracks_upward_trend() {
        let data: Vec<f64> = (0..42).map(|i| 10.0 + i as f64).collect();
        let mut model = HoltWinters::fallback();
        model.fit(&data).unwrap();
        let forecast = model.predict(7).unwrap();
        assert!(forecast[6] > forecast[0]);
        assert!(*forecast.last().unwrap() > *data.last().unwrap() - 5.0);
    }

    #[test]
    fn test_empty_series_rejected() {
        let mut model = HoltWinters::fallback();
        assert!(matches!(
            model.fit(&[]),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_not_fitted() {
        let model = HoltWinters::fallback();
        assert!(matches!(model.predict(3), Err(ForecastError::NotFitted)));
    }
}
