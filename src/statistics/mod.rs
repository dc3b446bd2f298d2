// =============================================================================
// Statistics Module
// =============================================================================
//
// Return-derived aggregate metrics over a close-price sequence. All functions
// are pure; length preconditions are enforced by the engine before any of
// them is called.

pub mod correlation;
pub mod drawdown;
pub mod returns;
pub mod risk;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

pub use correlation::pearson_correlation;
pub use drawdown::max_drawdown;
pub use returns::{annualized_mean_return, calculate_returns, total_return};
pub use risk::{sharpe_ratio, volatility};

/// Trading periods per year used for annualisation.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

fn default_risk_free_rate() -> f64 {
    0.02
}

fn default_annualize() -> bool {
    true
}

fn default_periods_per_year() -> f64 {
    TRADING_DAYS_PER_YEAR
}

/// Parameters for the statistics summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsParams {
    /// Annual risk-free rate subtracted from the annualised mean return.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Scale volatility by sqrt(periods_per_year).
    #[serde(default = "default_annualize")]
    pub annualize: bool,

    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

impl Default for StatisticsParams {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            annualize: default_annualize(),
            periods_per_year: default_periods_per_year(),
        }
    }
}

impl StatisticsParams {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::invalid_parameter(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(AnalyticsError::invalid_parameter(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = StatisticsParams::default();
        assert_eq!(params.risk_free_rate, 0.02);
        assert!(params.annualize);
        assert_eq!(params.periods_per_year, 252.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: StatisticsParams = serde_json::from_str(r#"{"annualize": false}"#).unwrap();
        assert!(!params.annualize);
        assert_eq!(params.risk_free_rate, 0.02);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let params = StatisticsParams {
            periods_per_year: 0.0,
            ..StatisticsParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(AnalyticsError::InvalidParameter(_))
        ));

        let params = StatisticsParams {
            risk_free_rate: f64::NAN,
            ..StatisticsParams::default()
        };
        assert!(params.validate().is_err());
    }
}
