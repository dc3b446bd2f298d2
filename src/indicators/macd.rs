// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   macd_line   = EMA(close, fast) - EMA(close, slow)
//   signal_line = EMA(macd_line, signal)
//   histogram   = macd_line - signal_line
//
// All three series are aligned with the input and defined from index 0, since
// the underlying EMAs have no warm-up.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;

/// The three aligned MACD component series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD for `closes` with the given EMA spans.
///
/// Spans are not validated here; a zero span yields a zero EMA.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = calculate_ema(&macd_line, signal);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdSeries {
        macd_line,
        signal_line,
        histogram,
    }
}
