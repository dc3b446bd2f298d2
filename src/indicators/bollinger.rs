// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the trailing *sample* standard
// deviation (n - 1 denominator) over the same window as the SMA.
//
// Positions before the window fills hold 0.0 in every band. A one-element
// window has no sample deviation: the middle band is the close, while σ and
// the upper and lower bands carry the 0.0 placeholder.

use serde::Serialize;

use crate::series::rolling_mean_std;

/// Aligned Bollinger Band series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper_band: Vec<f64>,
    pub middle_band: Vec<f64>,
    pub lower_band: Vec<f64>,
    /// Rolling sample standard deviation (σ) behind the bands.
    pub band_width: Vec<f64>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// - `upper_band`  = SMA + `num_std` * σ
/// - `middle_band` = SMA
/// - `lower_band`  = SMA - `num_std` * σ
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerBands {
    let (middle_band, band_width) = rolling_mean_std(closes, period);

    let mut upper_band = vec![0.0; closes.len()];
    let mut lower_band = vec![0.0; closes.len()];
    if period > 1 && closes.len() >= period {
        for i in (period - 1)..closes.len() {
            let offset = num_std * band_width[i];
            upper_band[i] = middle_band[i] + offset;
            lower_band[i] = middle_band[i] - offset;
        }
    }

    BollingerBands {
        upper_band,
        middle_band,
        lower_band,
        band_width,
    }
}
