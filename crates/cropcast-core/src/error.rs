//! Error types for the forecasting core

use thiserror::Error;

/// Errors that can occur during series generation and forecasting
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Insufficient data points for the operation
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Input series contains values the models cannot handle
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Model must be fitted before prediction
    #[error("Model must be fitted before prediction")]
    NotFitted,
}

impl ForecastError {
    pub(crate) fn invalid_parameter(name: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ForecastError>;
