// =============================================================================
// Pearson Correlation
// =============================================================================
//
//   ρ = Σ(x - x̄)(y - ȳ) / sqrt(Σ(x - x̄)² · Σ(y - ȳ)²)
//
// A series with zero variance makes ρ undefined; that is reported as an error
// instead of being coerced to a number.

use crate::error::{ensure_len, AnalyticsError};
use crate::series::mean;

/// Pearson correlation coefficient of two equal-length series.
///
/// # Errors
/// - `InvalidParameter` when the lengths differ.
/// - `InsufficientData` when fewer than two points are supplied.
/// - `UndefinedCorrelation` when either series is constant.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64, AnalyticsError> {
    if xs.len() != ys.len() {
        return Err(AnalyticsError::invalid_parameter(format!(
            "series lengths differ: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    ensure_len(xs.len(), 2)?;

    let (Some(mx), Some(my)) = (mean(xs), mean(ys)) else {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            actual: 0,
        });
    };

    let (mut sxy, mut sxx, mut syy) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Err(AnalyticsError::UndefinedCorrelation);
    }

    let rho = sxy / (sxx * syy).sqrt();
    if !rho.is_finite() {
        return Err(AnalyticsError::UndefinedCorrelation);
    }
    Ok(rho.clamp(-1.0, 1.0))
}
