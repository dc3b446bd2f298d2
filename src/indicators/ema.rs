// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_0      = close_0
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// There is no warm-up: the series is defined from index 0. The recursion is
// evaluated in delta form, EMA_{t-1} + multiplier * (close_t - EMA_{t-1}), so
// a flat input is an exact fixed point.
// =============================================================================

use crate::series::finite_or_zero;

/// Compute the EMA series for the given `closes` slice and span `period`.
///
/// The output has the same length as `closes`.
///
/// # Edge cases
/// - `period == 0` => all zeros
/// - empty input => empty vec
/// - Non-finite outputs are replaced with 0.0.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![0.0; closes.len()];
    }
    let multiplier = 2.0 / (period + 1) as f64;

    closes
        .iter()
        .scan(None::<f64>, |prev, &close| {
            let ema = match *prev {
                None => close,
                Some(p) => p + multiplier * (close - p),
            };
            *prev = Some(ema);
            Some(finite_or_zero(ema))
        })
        .collect()
}
