// =============================================================================
// Sequence utilities shared by the indicator and statistics engines
// =============================================================================
//
// Means are anchored on the first element (a + Σ(x - a) / n). A flat window
// then reproduces its value exactly, and zero-variance checks downstream can
// compare against 0.0 without a tolerance.

/// Arithmetic mean of `values`, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    let anchor = *values.first()?;
    let offset: f64 = values.iter().map(|x| x - anchor).sum();
    Some(anchor + offset / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` when fewer than two values are supplied.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Trailing window mean: `out[i]` is the mean of `values[i+1-period..=i]`,
/// and 0.0 until the window is full.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling_mean_std(values, period).0
}

/// Trailing window mean and sample standard deviation in one O(n) pass.
///
/// Both are 0.0 until the window is full; the deviation is also 0.0 for a
/// one-element window. A window whose values are all equal reports that
/// value and a deviation of exactly 0.0.
pub fn rolling_mean_std(values: &[f64], period: usize) -> (Vec<f64>, Vec<f64>) {
    let mut means = vec![0.0; values.len()];
    let mut stds = vec![0.0; values.len()];
    let Some(&anchor) = values.first() else {
        return (means, stds);
    };
    if period == 0 || values.len() < period {
        return (means, stds);
    }

    let mut window = RollingMoments::new(anchor);
    let mut run = 0usize;
    for (i, &x) in values.iter().enumerate() {
        run = if i > 0 && x == values[i - 1] { run + 1 } else { 1 };
        match i.checked_sub(period) {
            Some(j) => window.replace(values[j], x),
            None => window.insert(x),
        }
        if i + 1 < period {
            continue;
        }

        if run >= period {
            means[i] = finite_or_zero(x);
            window.reset_spread();
        } else {
            means[i] = finite_or_zero(window.mean());
            if period > 1 {
                let var = window.m2.max(0.0) / (period - 1) as f64;
                stds[i] = finite_or_zero(var.sqrt());
            }
        }
    }
    (means, stds)
}

/// Running moments of a fixed-size window.
///
/// The sum is kept as offsets from `anchor` with Neumaier compensation; the
/// sum of squared deviations (`m2`) is slid with a Welford-style update.
struct RollingMoments {
    anchor: f64,
    count: usize,
    sum: f64,
    compensation: f64,
    m2: f64,
}

impl RollingMoments {
    fn new(anchor: f64) -> Self {
        Self {
            anchor,
            count: 0,
            sum: 0.0,
            compensation: 0.0,
            m2: 0.0,
        }
    }

    fn mean(&self) -> f64 {
        self.anchor + (self.sum + self.compensation) / self.count as f64
    }

    fn accumulate(&mut self, offset: f64) {
        let total = self.sum + offset;
        if self.sum.abs() >= offset.abs() {
            self.compensation += (self.sum - total) + offset;
        } else {
            self.compensation += (offset - total) + self.sum;
        }
        self.sum = total;
    }

    /// Grow the window by one value.
    fn insert(&mut self, x: f64) {
        let prev_mean = if self.count == 0 { x } else { self.mean() };
        self.count += 1;
        self.accumulate(x - self.anchor);
        if self.count > 1 {
            self.m2 += (x - prev_mean) * (x - self.mean());
        }
    }

    /// Slide a full window: `outgoing` leaves, `incoming` enters.
    fn replace(&mut self, outgoing: f64, incoming: f64) {
        let prev_mean = self.mean();
        self.accumulate(self.anchor - outgoing);
        self.accumulate(incoming - self.anchor);
        let mean = self.mean();
        self.m2 += (incoming - outgoing) * (incoming - mean + outgoing - prev_mean);
    }

    /// The window is flat, so its true spread is zero.
    fn reset_spread(&mut self) {
        self.m2 = 0.0;
    }
}

/// Simple returns `(P[i] - P[i-1]) / P[i-1]` for i = 1..n. Length n - 1.
pub fn pct_change(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Replace NaN / ±inf with the 0.0 placeholder.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn mean_of_flat_window_is_exact() {
        let values = vec![0.1; 7];
        assert_eq!(mean(&values), Some(0.1));
    }

    #[test]
    fn mean_known_value() {
        assert_eq!(mean(&[100.0, 102.0, 101.0]), Some(101.0));
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // Deviations from 5: -3, -1, 1, 3 => ss = 20, / 3
        let std = sample_std(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((std - (20.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(sample_std(&[1.0]).is_none());
    }

    #[test]
    fn rolling_mean_pads_with_zeros() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out, vec![0.0, 0.0, 2.0, 3.0]);
    }

    #[test]
    fn rolling_short_input_is_all_zeros() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 5), vec![0.0, 0.0]);
        assert_eq!(rolling_mean_std(&[1.0, 2.0], 0).1, vec![0.0, 0.0]);
    }

    #[test]
    fn rolling_std_single_element_window_is_zero() {
        assert_eq!(rolling_mean_std(&[3.0, 5.0], 1), (vec![3.0, 5.0], vec![0.0, 0.0]));
    }

    #[test]
    fn rolling_matches_per_window_recompute() {
        let values: Vec<f64> = (0..200)
            .map(|i| 50.0 + (f64::from(i) * 0.37).sin() * 8.0 + f64::from(i % 11) * 0.25)
            .collect();
        for period in [2, 5, 17, 64] {
            let (means, stds) = rolling_mean_std(&values, period);
            for (k, window) in values.windows(period).enumerate() {
                let i = k + period - 1;
                let expected_mean = mean(window).unwrap();
                let expected_std = sample_std(window).unwrap();
                assert!((means[i] - expected_mean).abs() < 1e-9, "mean at {i}, period {period}");
                assert!((stds[i] - expected_std).abs() < 1e-9, "std at {i}, period {period}");
            }
        }
    }

    #[test]
    fn rolling_flat_stretch_inside_a_trending_series_is_exact() {
        let mut values: Vec<f64> = (1..=30).map(|i| f64::from(i) * 1.1).collect();
        values.extend(std::iter::repeat(0.7).take(10));
        let (means, stds) = rolling_mean_std(&values, 5);
        for i in 34..values.len() {
            assert_eq!(means[i], 0.7);
            assert_eq!(stds[i], 0.0);
        }
    }

    #[test]
    fn rolling_long_window_over_long_input() {
        // Consecutive integers: window mean is the midpoint, sample variance
        // is m(m+1)/12 for a window of m values.
        let values: Vec<f64> = (0..100_000).map(f64::from).collect();
        let period = 50_000;
        let (means, stds) = rolling_mean_std(&values, period);
        let last = values.len() - 1;
        assert_eq!(means[last], 74_999.5);
        assert_eq!(means[period - 1], 24_999.5);
        let m = period as f64;
        let expected_std = (m * (m + 1.0) / 12.0).sqrt();
        assert!((stds[last] - expected_std).abs() / expected_std < 1e-9);
    }

    #[test]
    fn pct_change_two_points() {
        assert_eq!(pct_change(&[100.0, 110.0]), vec![0.10]);
        assert!(pct_change(&[100.0]).is_empty());
    }

    #[test]
    fn finite_or_zero_replaces_non_finite() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(-2.5), -2.5);
    }
}
