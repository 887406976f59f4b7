//! Forecast classification: trend labels, representative values, and
//! demand buckets
//!
//! A multi-step forecast is reduced to two categorical facts — is the
//! series heading up, down, or sideways, and (for demand indices) how
//! strong is it — plus one representative scalar. Classification never
//! fails: when the regression is degenerate it falls back to comparing the
//! endpoints, and when even that is impossible the label is `Stable`.

use crate::algorithms::linear_regression::LinearRegression;
use crate::algorithms::Predictor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slope magnitude below which a forecast counts as flat
pub const DEFAULT_SLOPE_THRESHOLD: f64 = 0.5;

/// Percent-change threshold for the endpoint-comparison fallback
pub const DEFAULT_PERCENT_THRESHOLD: f64 = 5.0;

/// Demand bucket boundaries on the 0-100 index, inclusive on the high side
pub const HIGH_DEMAND_FLOOR: f64 = 66.0;
pub const MEDIUM_DEMAND_FLOOR: f64 = 33.0;

/// Forecast horizon index used as the representative value ("day 7");
/// configurable per domain.
pub const DEFAULT_REPRESENTATIVE_INDEX: usize = 6;

/// Direction of a forecast over its horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Demand strength bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

impl DemandLevel {
    /// Bucket a 0-100 demand index: >= 66 high, >= 33 medium, else low
    pub fn from_index(value: f64) -> Self {
        if value >= HIGH_DEMAND_FLOOR {
            DemandLevel::High
        } else if value >= MEDIUM_DEMAND_FLOOR {
            DemandLevel::Medium
        } else {
            DemandLevel::Low
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DemandLevel::High => "high",
            DemandLevel::Medium => "medium",
            DemandLevel::Low => "low",
        };
        f.write_str(label)
    }
}

/// Label a forecast by the slope of its least-squares line
///
/// Slope above `slope_threshold` is `Increasing`, below the negation
/// `Decreasing`, otherwise `Stable`. When the regression cannot be fitted,
/// falls back to the percent change between the first and last values.
pub fn classify_trend(forecast: &[f64], slope_threshold: f64, percent_threshold: f64) -> Trend {
    let mut regression = LinearRegression::new();
    if regression.fit(forecast).is_ok() {
        let slope = regression.slope();
        return if slope > slope_threshold {
            Trend::Increasing
        } else if slope < -slope_threshold {
            Trend::Decreasing
        } else {
            Trend::Stable
        };
    }

    // Endpoint comparison when the regression is degenerate
    match (forecast.first(), forecast.last()) {
        (Some(&first), Some(&last)) if first.abs() > f64::EPSILON => {
            let change = (last - first) / first * 100.0;
            if change > percent_threshold {
                Trend::Increasing
            } else if change < -percent_threshold {
                Trend::Decreasing
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    }
}

/// Extract the representative scalar from a forecast
///
/// Takes `forecast[index]` when present and finite; otherwise the last
/// historical observation stands in.
pub fn representative(forecast: &[f64], history: &[f64], index: usize) -> f64 {
    forecast
        .get(index)
        .copied()
        .filter(|v| v.is_finite())
        .or_else(|| history.last().copied())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(slope: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| 50.0 + slope * i as f64).collect()
    }

    #[test]
    fn test_trend_thresholds() {
        let increasing = line(1.0, 14);
        let decreasing = line(-1.0, 14);
        let flat = line(0.0, 14);

        assert_eq!(
            classify_trend(&increasing, DEFAULT_SLOPE_THRESHOLD, DEFAULT_PERCENT_THRESHOLD),
            Trend::Increasing
        );
        assert_eq!(
            classify_trend(&decreasing, DEFAULT_SLOPE_THRESHOLD, DEFAULT_PERCENT_THRESHOLD),
            Trend::Decreasing
        );
        assert_eq!(
            classify_trend(&flat, DEFAULT_SLOPE_THRESHOLD, DEFAULT_PERCENT_THRESHOLD),
            Trend::Stable
        );
    }

    #[test]
    fn test_trend_threshold_boundary() {
        assert_eq!(
            classify_trend(&line(0.49, 14), DEFAULT_SLOPE_THRESHOLD, DEFAULT_PERCENT_THRESHOLD),
            Trend::Stable
        );
        assert_eq!(
            classify_trend(&line(0.51, 14), DEFAULT_SLOPE_THRESHOLD, DEFAULT_PERCENT_THRESHOLD),
            Trend::Increasing
        );
    }

    #[test]
    fn test_trend_fallback_on_single_point() {
        // One point cannot be regressed and has equal endpoints
        assert_eq!(
            classify_trend(&[42.0], DEFAULT_SLOPE_THRESHOLD, DEFAULT_PERCENT_THRESHOLD),
            Trend::Stable
        );
        assert_eq!(
            classify_trend(&[], DEFAULT_SLOPE_THRESHOLD, DEFAULT_PERCENT_THRESHOLD),
            Trend::Stable
        );
    }

    #[test]
    fn test_demand_buckets() {
        assert_eq!(DemandLevel::from_index(70.0), DemandLevel::High);
        assert_eq!(DemandLevel::from_index(50.0), DemandLevel::Medium);
        assert_eq!(DemandLevel::from_index(10.0), DemandLevel::Low);
        // Boundaries are inclusive on the high/medium side
        assert_eq!(DemandLevel::from_index(66.0), DemandLevel::High);
        assert_eq!(DemandLevel::from_index(33.0), DemandLevel::Medium);
        assert_eq!(DemandLevel::from_index(32.99), DemandLevel::Low);
    }

    #[test]
    fn test_representative_value() {
        let forecast = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let history = vec![10.0, 11.0];
        assert_eq!(
            representative(&forecast, &history, DEFAULT_REPRESENTATIVE_INDEX),
            7.0
        );

        // Short forecast falls back to the last observation
        let short = vec![1.0, 2.0];
        assert_eq!(
            representative(&short, &history, DEFAULT_REPRESENTATIVE_INDEX),
            11.0
        );
    }

    #[test]
    fn test_labels_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Trend::Increasing).unwrap(), "\"increasing\"");
        assert_eq!(serde_json::to_string(&DemandLevel::High).unwrap(), "\"high\"");
        assert_eq!(Trend::Stable.to_string(), "stable");
        assert_eq!(DemandLevel::Medium.to_string(), "medium");
    }
}
