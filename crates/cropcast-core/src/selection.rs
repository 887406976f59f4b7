//! ARIMA order selection via grid search
//!
//! Scans a small (p, d, q) grid, fits each candidate, and keeps the model
//! with the lowest AIC. A candidate that fails to fit (short series,
//! numerically degenerate orders) is skipped rather than aborting the
//! search; when every candidate fails the selector reports `None` and the
//! caller switches to the Holt-Winters fallback.

use crate::algorithms::arima::Arima;
use crate::algorithms::Predictor;
use serde::{Deserialize, Serialize};

/// Inclusive upper bounds of the (p, d, q) search grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
}

impl GridBounds {
    pub const fn new(max_p: usize, max_d: usize, max_q: usize) -> Self {
        Self {
            max_p,
            max_d,
            max_q,
        }
    }

    /// Number of candidate orders in the grid
    pub const fn candidates(&self) -> usize {
        (self.max_p + 1) * (self.max_d + 1) * (self.max_q + 1)
    }
}

/// Grid-search selector over ARIMA orders
#[derive(Debug, Clone)]
pub struct ArimaSelector {
    bounds: GridBounds,
}

impl ArimaSelector {
    pub fn new(bounds: GridBounds) -> Self {
        Self { bounds }
    }

    /// Fit every candidate order and return the one with the strictly
    /// lowest finite AIC; ties keep the earliest candidate in scan order.
    /// Returns `None` when no candidate produced a usable fit.
    pub fn select(&self, data: &[f64]) -> Option<Arima> {
        let mut best: Option<(Arima, f64)> = None;

        for p in 0..=self.bounds.max_p {
            for d in 0..=self.bounds.max_d {
                for q in 0..=self.bounds.max_q {
                    let Ok(mut model) = Arima::new(p, d, q) else {
                        continue;
                    };
                    if let Err(err) = model.fit(data) {
                        tracing::trace!(p, d, q, %err, "candidate skipped");
                        continue;
                    }
                    let Some(aic) = model.aic().filter(|a| a.is_finite()) else {
                        continue;
                    };

                    let improves = match &best {
                        Some((_, best_aic)) => aic < *best_aic,
                        None => true,
                    };
                    if improves {
                        tracing::trace!(p, d, q, aic, "new best candidate");
                        best = Some((model, aic));
                    }
                }
            }
        }

        best.map(|(model, _)| model)
    }
}
