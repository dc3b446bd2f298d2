// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator transforms over a close-price sequence.
// Every function returns series aligned index-for-index with its input;
// positions without a full window, or whose value is not finite, hold 0.0.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdSeries};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
