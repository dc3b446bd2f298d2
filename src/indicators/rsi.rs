// =============================================================================
// Relative Strength Index (RSI): Simple Moving Window
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1: Compute price changes: d_0 = 0, d_t = close_t - close_{t-1}.
// Step 2: gain_t = max(d_t, 0), loss_t = max(-d_t, 0).
// Step 3: avg_gain / avg_loss = trailing `period` window means of gain / loss.
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The zero delta at index 0 counts toward the first window, so the first
// defined RSI sits at index `period - 1`. Earlier positions hold 0.0.
// =============================================================================

use crate::series::rolling_mean;

/// Compute the RSI series for the given `closes` and `period`.
///
/// The output is aligned with `closes`.
///
/// # Edge cases
/// - `period == 0` => all zeros
/// - `closes.len() < period` => all zeros
/// - Average loss of exactly zero => 100.0, including a perfectly flat window.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return vec![0.0; closes.len()];
    }

    // --- Split deltas into gains and losses ---------------------------------
    let deltas = std::iter::once(0.0).chain(closes.windows(2).map(|w| w[1] - w[0]));
    let (gains, losses): (Vec<f64>, Vec<f64>) =
        deltas.map(|d| (d.max(0.0), (-d).max(0.0))).unzip();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    let mut result = vec![0.0; closes.len()];
    for i in (period - 1)..closes.len() {
        result[i] = rsi_from_averages(avg_gain[i], avg_loss[i]);
    }
    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// A zero average loss makes RS infinite; that case is answered directly
/// since the division would otherwise produce NaN when both averages are 0.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    if rsi.is_finite() {
        rsi.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
