//! Weather forecasting domain
//!
//! Synthesizes temperature and rainfall histories for a region, runs each
//! through the forecast pipeline, and estimates next-day humidity by
//! regressing the synthetic humidity series on temperature over a trailing
//! window. Regional character comes from a small parameter lookup keyed on
//! the region name.

use crate::algorithms::linear_regression::LinearRegression;
use crate::classify::Trend;
use crate::error::{ForecastError, Result};
use crate::pipeline::{DomainConfig, ForecastPipeline};
use crate::synthetic::{generate, SeededRng, SeriesParams};
use crate::utils::round_dp;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Valid temperature range in °C
pub const TEMPERATURE_RANGE: (f64, f64) = (15.0, 45.0);

/// Valid humidity range in percent
pub const HUMIDITY_RANGE: (f64, f64) = (30.0, 95.0);

/// Observations used by the humidity regression
const HUMIDITY_WINDOW: usize = 14;

/// One day of the forecast horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyOutlook {
    /// Days ahead, 1-based
    pub day: u32,
    /// Forecast temperature in °C
    pub temperature: f64,
    /// Forecast rainfall in mm
    pub rainfall: f64,
}

/// Weather prediction for a region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherOutlook {
    pub region: String,
    /// Next-day temperature in °C
    pub temperature: f64,
    /// Next-day relative humidity in percent
    pub humidity: f64,
    /// Next-day rainfall in mm
    pub rainfall: f64,
    /// Direction of temperature over the horizon
    pub temperature_trend: Trend,
    /// Per-day forecast over the full horizon
    pub outlook: Vec<DailyOutlook>,
}

struct RegionParams {
    base_temp: f64,
    base_rain: f64,
}

/// Regional base climate, matched case-insensitively on the region name
fn region_params(region: &str) -> RegionParams {
    let lower = region.to_lowercase();
    let base_temp = if lower.contains("punjab") {
        25.0
    } else if lower.contains("kerala") {
        28.0
    } else if lower.contains("rajasthan") {
        30.0
    } else {
        27.0
    };
    let base_rain = if lower.contains("kerala") {
        12.0
    } else if lower.contains("rajasthan") {
        3.0
    } else {
        8.0
    };
    RegionParams {
        base_temp,
        base_rain,
    }
}

fn temperature_params(region: &RegionParams) -> SeriesParams {
    SeriesParams {
        base: region.base_temp,
        volatility: 8.0,
        amplitude: 3.0,
        period: 7.0,
        phase: 0.0,
        trend: 0.0,
        min: Some(TEMPERATURE_RANGE.0),
        max: Some(TEMPERATURE_RANGE.1),
    }
}

fn rainfall_params(region: &RegionParams) -> SeriesParams {
    SeriesParams {
        base: region.base_rain,
        volatility: 15.0,
        amplitude: 5.0,
        // The rainfall cycle leads temperature by a quarter turn plus the
        // cos-to-sin shift
        phase: PI / 4.0 + PI / 2.0,
        period: 7.0,
        trend: 0.0,
        min: Some(0.0),
        max: None,
    }
}

/// Derive a humidity series from temperature and rainfall
///
/// Humidity runs inversely to temperature and rises with rainfall; noise
/// comes from the same seeded generator as the rest of the history so the
/// whole weather pipeline stays reproducible.
fn humidity_series(temps: &[f64], rain: &[f64], rng: &mut SeededRng) -> Vec<f64> {
    temps
        .iter()
        .zip(rain)
        .map(|(&t, &r)| {
            let h = 80.0 - (t - 25.0) * 1.5 + r * 0.8 + rng.next_centered() * 10.0;
            h.clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1)
        })
        .collect()
}

/// Predict next-day humidity from the forecast temperature
///
/// OLS of humidity on temperature over the trailing window, evaluated at
/// the first forecast temperature. When the regression is degenerate the
/// correlation formula stands in.
fn predict_humidity(temps: &[f64], humidity: &[f64], next_temp: f64, next_rain: f64) -> f64 {
    let start = temps.len().saturating_sub(HUMIDITY_WINDOW);
    let window_temps = &temps[start..];
    let window_humidity = &humidity[start..];

    let mut regression = LinearRegression::new();
    let predicted = regression
        .fit_xy(window_temps, window_humidity)
        .and_then(|_| regression.predict_at(next_temp))
        .unwrap_or_else(|_| 80.0 - (next_temp - 25.0) * 1.5 + next_rain * 0.8);

    predicted.clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1).round()
}

/// Forecast weather for a region from a synthetic history of `days`
/// observations
pub fn predict_weather(region: &str, days: usize) -> Result<WeatherOutlook> {
    if region.trim().is_empty() {
        return Err(ForecastError::invalid_parameter(
            "region",
            "must not be empty",
        ));
    }
    if days == 0 {
        return Err(ForecastError::invalid_parameter("days", "must be positive"));
    }

    let params = region_params(region);
    let mut rng = SeededRng::from_seed(&format!("{region}_weather"));

    let temps: Vec<f64> = generate(&temperature_params(&params), &mut rng, days)?
        .into_iter()
        .map(|v| round_dp(v, 1))
        .collect();
    let rain: Vec<f64> = generate(&rainfall_params(&params), &mut rng, days)?
        .into_iter()
        .map(|v| round_dp(v, 1))
        .collect();
    let humidity = humidity_series(&temps, &rain, &mut rng);

    let temp_forecast = ForecastPipeline::new(
        DomainConfig::weather().with_clamp(Some(TEMPERATURE_RANGE.0), Some(TEMPERATURE_RANGE.1)),
    )?
    .run(&temps)?;
    let rain_forecast =
        ForecastPipeline::new(DomainConfig::weather().with_clamp(Some(0.0), None))?.run(&rain)?;

    tracing::debug!(
        region,
        temperature_model = %temp_forecast.model,
        rainfall_model = %rain_forecast.model,
        "weather forecast complete"
    );

    let predicted_humidity = predict_humidity(
        &temps,
        &humidity,
        temp_forecast.values[0],
        rain_forecast.values[0],
    );

    let outlook = temp_forecast
        .values
        .iter()
        .zip(&rain_forecast.values)
        .enumerate()
        .map(|(i, (&t, &r))| DailyOutlook {
            day: i as u32 + 1,
            temperature: round_dp(t, 1),
            rainfall: round_dp(r, 1),
        })
        .collect();

    Ok(WeatherOutlook {
        region: region.to_string(),
        temperature: round_dp(temp_forecast.representative, 1),
        humidity: predicted_humidity,
        rainfall: round_dp(rain_forecast.representative, 1),
        temperature_trend: temp_forecast.trend,
        outlook,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_in_valid_ranges() {
        let outlook = predict_weather("Punjab", 60).unwrap();
        assert!((15.0..=45.0).contains(&outlook.temperature));
        assert!((30.0..=95.0).contains(&outlook.humidity));
        assert!(outlook.rainfall >= 0.0);
        assert_eq!(outlook.outlook.len(), 7);
        for day in &outlook.outlook {
            assert!((15.0..=45.0).contains(&day.temperature));
            assert!(day.rainfall >= 0.0);
        }
    }

    #[test]
    fn test_weather_deterministic() {
        let a = predict_weather("Kerala", 60).unwrap();
        let b = predict_weather("Kerala", 60).unwrap();
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.humidity, b.humidity);
        assert_eq!(a.rainfall, b.rainfall);
        assert_eq!(a.temperature_trend, b.temperature_trend);
    }

    #[test]
    fn test_weather_regions_differ() {
        let kerala = predict_weather("Kerala", 60).unwrap();
        let rajasthan = predict_weather("Rajasthan", 60).unwrap();
        // Different seeds and base climates should not coincide exactly
        assert!(
            kerala.temperature != rajasthan.temperature
                || kerala.rainfall != rajasthan.rainfall
        );
    }

    #[test]
    fn test_weather_rejects_empty_region() {
        assert!(matches!(
            predict_weather("  ", 60),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_weather_rejects_zero_days() {
        assert!(matches!(
            predict_weather("Punjab", 0),
            Err(ForecastError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_weather_short_history_still_forecasts() {
        // Shorter than every ARIMA minimum; the fallback covers it
        let outlook = predict_weather("Punjab", 5).unwrap();
        assert_eq!(outlook.outlook.len(), 7);
    }

    #[test]
    fn test_region_params_lookup() {
        assert_eq!(region_params("Punjab").base_temp, 25.0);
        assert_eq!(region_params("kerala south").base_rain, 12.0);
        assert_eq!(region_params("Rajasthan").base_rain, 3.0);
        assert_eq!(region_params("Somewhere").base_temp, 27.0);
    }
}
