//! Time series forecasting algorithms
//!
//! The core carries exactly the two model families the forecast pipeline
//! needs — ARIMA for the primary fit and Holt-Winters as the fallback —
//! plus the ordinary-least-squares line used for trend classification and
//! humidity estimation.

pub mod arima;
pub mod holt_winters;
pub mod linear_regression;

/// Common trait for all time series predictors
pub trait Predictor {
    /// Fit the model to historical data
    fn fit(&mut self, data: &[f64]) -> crate::Result<()>;

    /// Predict future values
    fn predict(&self, steps: usize) -> crate::Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}
