//! Ordinary least squares line fitting
//!
//! Used in two places: the trend classifier regresses forecast values on
//! their step index and thresholds the slope, and the weather module
//! regresses humidity on temperature over a trailing window.

use crate::algorithms::Predictor;
use crate::error::{ForecastError, Result};
use crate::utils::check_finite;
use serde::{Deserialize, Serialize};

/// Linear regression model
///
/// Fits `y = intercept + slope * x`. [`Predictor::fit`] regresses on the
/// time index 0, 1, 2, ...; [`LinearRegression::fit_xy`] accepts arbitrary
/// regressor values.
///
/// # Example
///
/// ```rust
/// use cropcast_core::algorithms::{linear_regression::LinearRegression, Predictor};
///
/// let data = vec![10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
/// let mut model = LinearRegression::new();
/// model.fit(&data).unwrap();
/// assert!((model.slope() - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Y-intercept
    intercept: f64,
    /// Slope per unit of the regressor
    slope: f64,
    /// Number of observations used in fitting
    n_observations: usize,
    /// Whether model has been fitted
    fitted: bool,
}

impl LinearRegression {
    /// Create a new linear regression model
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slope
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fit against arbitrary (x, y) pairs
    pub fn fit_xy(&mut self, xs: &[f64], ys: &[f64]) -> Result<()> {
        if xs.len() != ys.len() {
            return Err(ForecastError::InvalidData(format!(
                "regressor and response lengths differ: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                actual: xs.len(),
            });
        }
        check_finite(xs)?;
        check_finite(ys)?;

        let n = xs.len() as f64;
        let sum_x: f64 = xs.iter().sum();
        let sum_y: f64 = ys.iter().sum();
        let sum_x2: f64 = xs.iter().map(|x| x * x).sum();
        let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();

        let denominator = n * sum_x2 - sum_x * sum_x;
        if denominator.abs() < 1e-10 {
            return Err(ForecastError::InvalidData(
                "regressor has zero variance".to_string(),
            ));
        }

        self.slope = (n * sum_xy - sum_x * sum_y) / denominator;
        self.intercept = (sum_y - self.slope * sum_x) / n;
        self.n_observations = xs.len();
        self.fitted = true;

        Ok(())
    }

    /// Predict the response at a specific regressor value
    pub fn predict_at(&self, x: f64) -> Result<f64> {
        if !self.fitted {
            return Err(ForecastError::NotFitted);
        }
        Ok(self.intercept + self.slope * x)
    }
}

impl Predictor for LinearRegression {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let xs: Vec<f64> = (0..data.len()).map(|i| i as f64).collect();
        self.fit_xy(&xs, data)
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(ForecastError::NotFitted);
        }

        let n = self.n_observations;
        Ok((0..steps)
            .map(|i| self.intercept + self.slope * (n + i) as f64)
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_exact_line() {
        let data: Vec<f64> = (0..10).map(|i| 5.0 + 1.5 * i as f64).collect();
        let mut model = LinearRegression::new();
        model.fit(&data).unwrap();
        assert!((model.slope() - 1.5).abs() < 1e-9);
        assert!((model.intercept() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_continues_series() {
        let data = vec![10.0, 12.0, 14.0, 16.0];
        let mut model = LinearRegression::new();
        model.fit(&data).unwrap();
        let forecast = model.predict(2).unwrap();
        assert!((forecast[0] - 18.0).abs() < 1e-9);
        assert!((forecast[1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_xy_and_predict_at() {
        let xs = vec![20.0, 25.0, 30.0, 35.0];
        let ys = vec![85.0, 77.5, 70.0, 62.5];
        let mut model = LinearRegression::new();
        model.fit_xy(&xs, &ys).unwrap();
        assert!((model.slope() + 1.5).abs() < 1e-9);
        assert!((model.predict_at(28.0).unwrap() - 73.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_regressor() {
        let xs = vec![3.0, 3.0, 3.0];
        let ys = vec![1.0, 2.0, 3.0];
        let mut model = LinearRegression::new();
        assert!(matches!(
            model.fit_xy(&xs, &ys),
            Err(ForecastError::InvalidData(_))
        ));
    }

    #[test]
    fn test_too_few_points() {
        let mut model = LinearRegression::new();
        assert!(matches!(
            model.fit(&[1.0]),
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}
