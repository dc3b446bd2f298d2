// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Trailing arithmetic mean over a fixed window:
//   SMA_t = (close_{t-period+1} + ... + close_t) / period
//
// The output is aligned with the input. The first `period - 1` positions have
// no full window and hold the 0.0 placeholder.
// =============================================================================

use crate::series::rolling_mean;

/// Compute the SMA series for `closes` and look-back `period`.
///
/// # Edge cases
/// - `period == 0` => all zeros
/// - `closes.len() < period` => all zeros
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<f64> {
    rolling_mean(closes, period)
}
