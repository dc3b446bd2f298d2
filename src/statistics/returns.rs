// =============================================================================
// Simple Returns
// =============================================================================
//
//   r_i = (P_i - P_{i-1}) / P_{i-1}        for i = 1..n-1
//
// The difference form equals P_i / P_{i-1} - 1 algebraically and keeps round
// numbers round: [100, 110] gives exactly 0.10, where 110.0 / 100.0 - 1.0
// evaluates to 0.10000000000000009. The two forms agree to within an ulp or
// so, not bit for bit.

use crate::series::{mean, pct_change};

/// Per-period simple returns. Length is `prices.len() - 1` (empty for fewer
/// than two prices).
pub fn calculate_returns(prices: &[f64]) -> Vec<f64> {
    pct_change(prices)
}

/// Mean per-period return scaled by `periods_per_year`. 0.0 for no returns.
pub fn annualized_mean_return(returns: &[f64], periods_per_year: f64) -> f64 {
    mean(returns).map_or(0.0, |m| m * periods_per_year)
}

/// Return from the first to the last price, or `None` for an empty slice.
pub fn total_return(prices: &[f64]) -> Option<f64> {
    let first = *prices.first()?;
    let last = *prices.last()?;
    Some((last - first) / first)
}
