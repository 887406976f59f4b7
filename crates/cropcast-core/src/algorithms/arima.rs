//! ARIMA (AutoRegressive Integrated Moving Average) implementation
//!
//! The model combines three components:
//!
//! - **AR (AutoRegressive)**: Uses past values to predict future values
//! - **I (Integrated)**: Differencing to achieve stationarity
//! - **MA (Moving Average)**: Uses past forecast errors
//!
//! Each fitted model records its Akaike Information Criterion, which the
//! grid-search selector uses to rank candidate orders.
//!
//! ## Example
//!
//! ```rust
//! use cropcast_core::algorithms::{arima::Arima, Predictor};
//!
//! let data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
//! let mut model = Arima::new(1, 1, 0).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

use crate::algorithms::Predictor;
use crate::error::{ForecastError, Result};
use crate::utils::check_finite;
use serde::{Deserialize, Serialize};

/// ARIMA model for time series forecasting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arima {
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// AR coefficients
    ar_coeffs: Vec<f64>,
    /// MA coefficients
    ma_coeffs: Vec<f64>,
    /// Constant term
    constant: f64,
    /// Original data (for undifferencing)
    original_data: Vec<f64>,
    /// Differenced data
    differenced_data: Vec<f64>,
    /// Residuals from fitting
    residuals: Vec<f64>,
    /// Akaike Information Criterion of the fit
    aic: Option<f64>,
    /// Whether the model has been fitted
    fitted: bool,
}

impl Arima {
    /// Create a new ARIMA model with specified orders
    ///
    /// # Arguments
    ///
    /// * `p` - Order of autoregressive component (0-10)
    /// * `d` - Degree of differencing (0-2)
    /// * `q` - Order of moving average component (0-10)
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > 10 {
            return Err(ForecastError::invalid_parameter(
                "p",
                "AR order must be <= 10",
            ));
        }
        if d > 2 {
            return Err(ForecastError::invalid_parameter(
                "d",
                "Differencing order must be <= 2",
            ));
        }
        if q > 10 {
            return Err(ForecastError::invalid_parameter(
                "q",
                "MA order must be <= 10",
            ));
        }

        Ok(Self {
            p,
            d,
            q,
            ar_coeffs: vec![0.0; p],
            ma_coeffs: vec![0.0; q],
            constant: 0.0,
            original_data: Vec::new(),
            differenced_data: Vec::new(),
            residuals: Vec::new(),
            aic: None,
            fitted: false,
        })
    }

    /// Apply differencing to make series stationary
    fn difference(data: &[f64], order: usize) -> Vec<f64> {
        let mut result = data.to_vec();
        for _ in 0..order {
            let mut differenced = Vec::with_capacity(result.len().saturating_sub(1));
            for i in 1..result.len() {
                differenced.push(result[i] - result[i - 1]);
            }
            result = differenced;
        }
        result
    }

    /// Reverse differencing to get original scale
    fn undifference(&self, forecasts: &[f64]) -> Vec<f64> {
        if self.d == 0 {
            return forecasts.to_vec();
        }

        let mut result = forecasts.to_vec();
        let n = self.original_data.len();

        for _ in 0..self.d {
            let last_value = self.original_data[n - 1];
            let mut cumsum = vec![last_value + result[0]];
            for i in 1..result.len() {
                cumsum.push(cumsum[i - 1] + result[i]);
            }
            result = cumsum;
        }

        result
    }

    /// Estimate AR coefficients using Yule-Walker equations
    fn estimate_ar_coefficients(&self, data: &[f64]) -> Vec<f64> {
        if self.p == 0 {
            return Vec::new();
        }

        let n = data.len();
        let mean: f64 = data.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();

        // Compute autocorrelations
        let mut autocorr = vec![0.0; self.p + 1];
        for k in 0..=self.p {
            let mut sum = 0.0;
            for i in k..n {
                sum += centered[i] * centered[i - k];
            }
            autocorr[k] = sum / n as f64;
        }

        // Solve Yule-Walker using Levinson-Durbin
        let mut coeffs = vec![0.0; self.p];
        if autocorr[0].abs() > 1e-10 {
            coeffs[0] = autocorr[1] / autocorr[0];

            for k in 1..self.p {
                let mut sum = autocorr[k + 1];
                for j in 0..k {
                    sum -= coeffs[j] * autocorr[k - j];
                }

                let mut denom = autocorr[0];
                for j in 0..k {
                    denom -= coeffs[j] * autocorr[j + 1];
                }

                if denom.abs() > 1e-10 {
                    let new_coeff = sum / denom;
                    let old_coeffs = coeffs.clone();
                    coeffs[k] = new_coeff;
                    for j in 0..k {
                        coeffs[j] = old_coeffs[j] - new_coeff * old_coeffs[k - 1 - j];
                    }
                }
            }
        }

        coeffs
    }

    /// Estimate MA coefficients from residuals
    fn estimate_ma_coefficients(&self, residuals: &[f64]) -> Vec<f64> {
        if self.q == 0 || residuals.is_empty() {
            return vec![0.0; self.q];
        }

        // Simple estimation using autocorrelation of residuals
        let n = residuals.len();
        let mean: f64 = residuals.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = residuals.iter().map(|x| x - mean).collect();

        let mut coeffs = vec![0.0; self.q];
        let var: f64 = centered.iter().map(|x| x * x).sum::<f64>() / n as f64;

        if var.abs() > 1e-10 {
            for k in 0..self.q {
                let mut sum = 0.0;
                for i in (k + 1)..n {
                    sum += centered[i] * centered[i - k - 1];
                }
                coeffs[k] = (sum / n as f64) / var;
                // Bound coefficients for stability
                coeffs[k] = coeffs[k].clamp(-0.99, 0.99);
            }
        }

        coeffs
    }

    /// AIC = n * ln(RSS / n) + 2k, with k = p + q + 1 for the constant.
    /// Residuals before index p carry no prediction and are excluded.
    fn compute_aic(&self) -> f64 {
        let usable = &self.residuals[self.p.min(self.residuals.len())..];
        let n = usable.len() as f64;
        if n < 1.0 {
            return f64::INFINITY;
        }

        let rss: f64 = usable.iter().map(|r| r * r).sum::<f64>().max(1e-10);
        let k = (self.p + self.q + 1) as f64;

        n * (rss / n).ln() + 2.0 * k
    }

    /// Get model orders (p, d, q)
    pub fn params(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Get AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// Get MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Akaike Information Criterion of the fit, `None` before fitting
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }
}

impl Predictor for Arima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let min_required = self.p + self.d + self.q + 10;
        if data.len() < min_required {
            return Err(ForecastError::InsufficientData {
                required: min_required,
                actual: data.len(),
            });
        }

        check_finite(data)?;

        self.original_data = data.to_vec();
        self.differenced_data = Self::difference(data, self.d);

        // Estimate AR coefficients
        self.ar_coeffs = self.estimate_ar_coefficients(&self.differenced_data);

        // Compute residuals
        let n = self.differenced_data.len();
        self.residuals = vec![0.0; n];
        let mean: f64 = self.differenced_data.iter().sum::<f64>() / n as f64;
        self.constant = mean;

        for i in self.p..n {
            let mut prediction = self.constant;
            for j in 0..self.p {
                prediction += self.ar_coeffs[j] * (self.differenced_data[i - j - 1] - mean);
            }
            self.residuals[i] = self.differenced_data[i] - prediction;
        }

        // Estimate MA coefficients
        self.ma_coeffs = self.estimate_ma_coefficients(&self.residuals);

        self.aic = Some(self.compute_aic());
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(ForecastError::NotFitted);
        }

        if steps == 0 {
            return Ok(Vec::new());
        }

        let n = self.differenced_data.len();
        let mut extended = self.differenced_data.clone();
        let mut extended_residuals = self.residuals.clone();

        // Generate forecasts on differenced scale
        for _ in 0..steps {
            let mut forecast = self.constant;

            // AR component
            for j in 0..self.p {
                let idx = extended.len() - j - 1;
                forecast += self.ar_coeffs[j] * (extended[idx] - self.constant);
            }

            // MA component
            for j in 0..self.q {
                if extended_residuals.len() > j {
                    let idx = extended_residuals.len() - j - 1;
                    forecast += self.ma_coeffs[j] * extended_residuals[idx];
                }
            }

            extended.push(forecast);
            extended_residuals.push(0.0); // Future residuals are 0
        }

        // Extract forecasts and undifference
        let forecasts: Vec<f64> = extended[n..].to_vec();
        Ok(self.undifference(&forecasts))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series(n: usize) -> Vec<f64> {
        (1..=n).map(|x| x as f64 + (x as f64 * 0.1).sin()).collect()
    }

    #[test]
    fn test_arima_creation() {
        assert!(Arima::new(1, 1, 1).is_ok());
        assert!(Arima::new(11, 0, 0).is_err());
        assert!(Arima::new(0, 3, 0).is_err());
        assert!(Arima::new(0, 0, 11).is_err());
    }

    #[test]
    fn test_arima_fit_predict() {
        let data = sample_series(50);
        let mut model = Arima::new(1, 1, 0).unwrap();

        assert!(model.fit(&data).is_ok());
        assert!(model.is_fitted());

        let forecast = model.predict(5).unwrap();
        assert_eq!(forecast.len(), 5);
        assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_arima_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        let mut model = Arima::new(1, 1, 1).unwrap();
        assert!(matches!(
            model.fit(&data),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_arima_rejects_nan() {
        let mut data = sample_series(30);
        data[10] = f64::NAN;
        let mut model = Arima::new(1, 0, 0).unwrap();
        assert!(matches!(
            model.fit(&data),
            Err(ForecastError::InvalidData(_))
        ));
    }

    #[test]
    fn test_arima_not_fitted() {
        let model = Arima::new(1, 0, 0).unwrap();
        assert!(matches!(model.predict(3), Err(ForecastError::NotFitted)));
        assert!(model.aic().is_none());
    }

    #[test]
    fn test_arima_aic_finite_after_fit() {
        let data = sample_series(60);
        let mut model = Arima::new(2, 1, 1).unwrap();
        model.fit(&data).unwrap();
        let aic = model.aic().unwrap();
        assert!(aic.is_finite());
    }

    #[test]
    fn test_arima_deterministic() {
        let data = sample_series(60);
        let mut a = Arima::new(1, 1, 1).unwrap();
        let mut b = Arima::new(1, 1, 1).unwrap();
        a.fit(&data).unwrap();
        b.fit(&data).unwrap();
        assert_eq!(a.predict(7).unwrap(), b.predict(7).unwrap());
        assert_eq!(a.aic(), b.aic());
    }

    #[test]
    fn test_arima_zero_steps() {
        let data = sample_series(30);
        let mut model = Arima::new(1, 0, 0).unwrap();
        model.fit(&data).unwrap();
        assert!(model.predict(0).unwrap().is_empty());
    }
}
