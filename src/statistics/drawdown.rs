// =============================================================================
// Maximum Drawdown
// =============================================================================
//
//   C_i = Π_{j<=i} (1 + r_j)          cumulative growth of one unit
//   M_i = max(C_0..=C_i)              running peak
//   D_i = (C_i - M_i) / M_i           relative decline from the peak
//   MDD = min_i D_i                   always <= 0
//
// The path starts at C_0 = 1 + r_0, so the first return sets the initial peak.

/// Maximum drawdown of the cumulative path built from per-period `returns`.
///
/// Returns 0.0 for an empty slice or a path that never falls below its peak.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut cumulative = 1.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;

    for &r in returns {
        cumulative *= 1.0 + r;
        peak = peak.max(cumulative);
        let drawdown = (cumulative - peak) / peak;
        if drawdown.is_finite() {
            worst = worst.min(drawdown);
        }
    }

    worst
}
