//! Small numeric helpers shared across the crate

use crate::error::{ForecastError, Result};

/// Round to a fixed number of decimal places
pub(crate) fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Reject series containing NaN or infinite values
pub(crate) fn check_finite(data: &[f64]) -> Result<()> {
    if data.iter().any(|x| !x.is_finite()) {
        return Err(ForecastError::InvalidData(
            "series contains NaN or infinite values".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(3.14159, 1), 3.1);
        assert_eq!(round_dp(3.15, 1), 3.2);
        assert_eq!(round_dp(45.678, 2), 45.68);
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(&[1.0, 2.0, 3.0]).is_ok());
        assert!(check_finite(&[1.0, f64::NAN]).is_err());
        assert!(check_finite(&[1.0, f64::INFINITY]).is_err());
    }
}
