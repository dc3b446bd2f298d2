// =============================================================================
// Volatility & Sharpe Ratio
// =============================================================================
//
//   volatility = stdev(r)                        (sample, n - 1)
//              * sqrt(periods_per_year)          when annualised
//   sharpe     = (mean(r) * periods_per_year - risk_free_rate)
//              / (stdev(r) * sqrt(periods_per_year))
//
// A zero denominator defines the Sharpe ratio as 0.0.

use crate::series::{mean, sample_std};

/// Sample standard deviation of `returns`, optionally annualised.
///
/// Fewer than two returns have no sample deviation; the result is 0.0.
pub fn volatility(returns: &[f64], annualize: bool, periods_per_year: f64) -> f64 {
    let std = sample_std(returns).unwrap_or(0.0);
    if annualize {
        std * periods_per_year.sqrt()
    } else {
        std
    }
}

/// Annualised Sharpe ratio of per-period `returns`.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    let Some(m) = mean(returns) else {
        return 0.0;
    };
    let excess = m * periods_per_year - risk_free_rate;
    let denominator = sample_std(returns).unwrap_or(0.0) * periods_per_year.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    excess / denominator
}
