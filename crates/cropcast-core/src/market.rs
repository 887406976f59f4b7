//! Market forecasting domain
//!
//! Synthesizes a correlated demand-index/price history per crop, forecasts
//! both series through the shared pipeline, and reports the price outlook
//! with a demand bucket and trend label. Crops are independent, so the
//! per-crop work fans out across the rayon thread pool.

use crate::classify::{DemandLevel, Trend};
use crate::error::{ForecastError, Result};
use crate::pipeline::{DomainConfig, ForecastPipeline};
use crate::synthetic::SeededRng;
use crate::utils::round_dp;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Valid demand-index range
pub const DEMAND_RANGE: (f64, f64) = (10.0, 100.0);

/// Seasonal period of market series in days
const MARKET_SEASON: f64 = 30.0;

/// Generation parameters for one crop
#[derive(Debug, Clone, Copy)]
struct CropParams {
    base_demand: f64,
    demand_volatility: f64,
    base_price: f64,
    price_volatility: f64,
    seasonality: f64,
}

const RICE: CropParams = CropParams {
    base_demand: 75.0,
    demand_volatility: 15.0,
    base_price: 45.0,
    price_volatility: 8.0,
    seasonality: 0.8,
};

/// Per-crop market character; unknown crops borrow the rice parameters
fn crop_params(crop: &str) -> CropParams {
    match crop.to_lowercase().as_str() {
        "rice" => RICE,
        "wheat" => CropParams {
            base_demand: 70.0,
            demand_volatility: 12.0,
            base_price: 38.0,
            price_volatility: 6.0,
            seasonality: 0.6,
        },
        "corn" => CropParams {
            base_demand: 65.0,
            demand_volatility: 18.0,
            base_price: 32.0,
            price_volatility: 10.0,
            seasonality: 1.0,
        },
        "soybeans" => CropParams {
            base_demand: 60.0,
            demand_volatility: 20.0,
            base_price: 55.0,
            price_volatility: 12.0,
            seasonality: 0.7,
        },
        "cotton" => CropParams {
            base_demand: 55.0,
            demand_volatility: 25.0,
            base_price: 78.0,
            price_volatility: 15.0,
            seasonality: 0.9,
        },
        "sugarcane" => CropParams {
            base_demand: 68.0,
            demand_volatility: 14.0,
            base_price: 28.0,
            price_volatility: 5.0,
            seasonality: 0.5,
        },
        "tomatoes" => CropParams {
            base_demand: 80.0,
            demand_volatility: 22.0,
            base_price: 65.0,
            price_volatility: 18.0,
            seasonality: 1.2,
        },
        "potatoes" => CropParams {
            base_demand: 72.0,
            demand_volatility: 16.0,
            base_price: 42.0,
            price_volatility: 12.0,
            seasonality: 0.8,
        },
        "onions" => CropParams {
            base_demand: 78.0,
            demand_volatility: 20.0,
            base_price: 48.0,
            price_volatility: 14.0,
            seasonality: 1.1,
        },
        "carrots" => CropParams {
            base_demand: 62.0,
            demand_volatility: 18.0,
            base_price: 52.0,
            price_volatility: 10.0,
            seasonality: 0.9,
        },
        _ => RICE,
    }
}

/// Paired demand and price history for one crop
#[derive(Debug, Clone)]
pub struct MarketHistory {
    pub demand: Vec<f64>,
    pub prices: Vec<f64>,
}

/// Synthesize a correlated demand/price history
///
/// Price is derived from the same day's demand (scaled by the base price)
/// before its own seasonal term, sign-flipped drift, and noise are added —
/// the two series are never generated independently, so the realistic
/// demand-price correlation is preserved. Floored at half the base price.
pub fn generate_market_history(crop: &str, region: &str, days: usize) -> Result<MarketHistory> {
    if days == 0 {
        return Err(ForecastError::invalid_parameter("days", "must be positive"));
    }

    let params = crop_params(crop);
    let mut rng = SeededRng::from_seed(&format!("{crop}{region}_market"));

    let mut demand_series = Vec::with_capacity(days);
    let mut price_series = Vec::with_capacity(days);

    for i in 0..days {
        let t = i as f64;
        let seasonal_demand = (t / MARKET_SEASON * TAU).sin() * params.seasonality * 10.0;
        let seasonal_price = (t / MARKET_SEASON * TAU + PI / 3.0).cos() * params.seasonality * 5.0;

        let drift_sign = if rng.next_f64() > 0.5 { 1.0 } else { -1.0 };

        let demand = (params.base_demand
            + seasonal_demand
            + t * 0.1
            + rng.next_centered() * params.demand_volatility)
            .clamp(DEMAND_RANGE.0, DEMAND_RANGE.1);

        let price_from_demand = params.base_price * (demand / params.base_demand);
        let price = (price_from_demand
            + seasonal_price
            + t * 0.05 * drift_sign
            + rng.next_centered() * params.price_volatility)
            .max(params.base_price * 0.5);

        demand_series.push(demand);
        price_series.push(price);
    }

    Ok(MarketHistory {
        demand: demand_series,
        prices: price_series,
    })
}

/// Market prediction for one crop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOutlook {
    pub crop: String,
    /// Representative forecast price
    pub price: f64,
    /// Demand bucket at the representative forecast
    pub demand: DemandLevel,
    /// Direction of price over the horizon
    pub trend: Trend,
    pub region: String,
}

fn predict_crop(crop: &str, region: &str, days: usize) -> Result<MarketOutlook> {
    if crop.trim().is_empty() {
        return Err(ForecastError::invalid_parameter(
            "crops",
            "crop names must not be empty",
        ));
    }

    let history = generate_market_history(crop, region, days)?;

    let demand_forecast = ForecastPipeline::new(
        DomainConfig::market().with_clamp(Some(0.0), Some(100.0)),
    )?
    .run(&history.demand)?;
    let price_forecast =
        ForecastPipeline::new(DomainConfig::market().with_clamp(Some(0.0), None))?
            .run(&history.prices)?;

    tracing::debug!(
        crop,
        region,
        demand_model = %demand_forecast.model,
        price_model = %price_forecast.model,
        "market forecast complete"
    );

    Ok(MarketOutlook {
        crop: crop.to_string(),
        price: round_dp(price_forecast.representative, 2),
        demand: DemandLevel::from_index(demand_forecast.representative),
        trend: price_forecast.trend,
        region: region.to_string(),
    })
}

/// Forecast market conditions for each crop in a region
///
/// Every crop's pipeline is independent; they run in parallel and results
/// come back in input order.
pub fn predict_market(crops: &[String], region: &str, days: usize) -> Result<Vec<MarketOutlook>> {
    if crops.is_empty() {
        return Err(ForecastError::invalid_parameter(
            "crops",
            "must not be empty",
        ));
    }
    if region.trim().is_empty() {
        return Err(ForecastError::invalid_parameter(
            "region",
            "must not be empty",
        ));
    }

    crops
        .par_iter()
        .map(|crop| predict_crop(crop, region, days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_respects_ranges() {
        let history = generate_market_history("Rice", "Punjab", 90).unwrap();
        assert_eq!(history.demand.len(), 90);
        assert_eq!(history.prices.len(), 90);
        assert!(history
            .demand
            .iter()
            .all(|&v| (10.0..=100.0).contains(&v)));
        assert!(history.prices.iter().all(|&p| p >= 45.0 * 0.5));
    }

    #[test]
    fn test_history_deterministic() {
        let a = generate_market_history("Wheat", "Punjab", 90).unwrap();
        let b = generate_market_history("Wheat", "Punjab", 90).unwrap();
        assert_eq!(a.demand, b.demand);
        assert_eq!(a.prices, b.prices);
    }

    #[test]
    fn test_price_tracks_demand() {
        // Price inherits the demand signal: days with above-base demand
        // should price above days with below-base demand, on average
        let history = generate_market_history("Cotton", "Punjab", 90).unwrap();
        let params = crop_params("Cotton");

        let (mut high_sum, mut high_n, mut low_sum, mut low_n) = (0.0, 0, 0.0, 0);
        for (d, p) in history.demand.iter().zip(&history.prices) {
            if *d >= params.base_demand {
                high_sum += p;
                high_n += 1;
            } else {
                low_sum += p;
                low_n += 1;
            }
        }
        assert!(high_n > 0 && low_n > 0);
        assert!(high_sum / high_n as f64 > low_sum / low_n as f64);
    }

    #[test]
    fn test_predict_market_shape() {
        let crops = vec!["Rice".to_string(), "Wheat".to_string(), "Corn".to_string()];
        let outlooks = predict_market(&crops, "Punjab", 90).unwrap();
        assert_eq!(outlooks.len(), 3);
        // Results preserve input order
        assert_eq!(outlooks[0].crop, "Rice");
        assert_eq!(outlooks[2].crop, "Corn");
        for outlook in &outlooks {
            assert!(outlook.price > 0.0);
            assert_eq!(outlook.region, "Punjab");
        }
    }

    #[test]
    fn test_predict_market_deterministic() {
        let crops = vec!["Tomatoes".to_string()];
        let a = predict_market(&crops, "Kerala", 90).unwrap();
        let b = predict_market(&crops, "Kerala", 90).unwrap();
        assert_eq!(a[0].price, b[0].price);
        assert_eq!(a[0].demand, b[0].demand);
        assert_eq!(a[0].trend, b[0].trend);
    }

    #[test]
    fn test_predict_market_rejects_bad_input() {
        assert!(predict_market(&[], "Punjab", 90).is_err());
        assert!(predict_market(&["Rice".to_string()], " ", 90).is_err());
        assert!(predict_market(&["  ".to_string()], "Punjab", 90).is_err());
    }

    #[test]
    fn test_unknown_crop_uses_default_params() {
        let outlooks =
            predict_market(&["Dragonfruit".to_string()], "Punjab", 90).unwrap();
        assert_eq!(outlooks.len(), 1);
        assert!(outlooks[0].price > 0.0);
    }
}
