// =============================================================================
// Analytics Engine: request-level entry points
// =============================================================================
//
// Routes a normalised `TimeSeries` to the indicator or statistics functions and
// packages the output with its symbol, indicator name and timestamps.
//
// Every call is a pure function of its input: no shared state, no I/O, no
// caching. Working buffers are sized to the input and dropped on return.
// =============================================================================

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{ensure_len, ensure_period, AnalyticsError};
use crate::indicators::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    BollingerBands, MacdSeries,
};
use crate::statistics::{
    annualized_mean_return, calculate_returns, max_drawdown, pearson_correlation, sharpe_ratio,
    total_return, volatility, StatisticsParams,
};
use crate::types::TimeSeries;

// =============================================================================
// Indicator selection
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bollinger,
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sma => write!(f, "SMA"),
            Self::Ema => write!(f, "EMA"),
            Self::Rsi => write!(f, "RSI"),
            Self::Macd => write!(f, "MACD"),
            Self::Bollinger => write!(f, "BOLLINGER"),
        }
    }
}

/// An indicator together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Indicator {
    Sma { period: usize },
    Ema { period: usize },
    Rsi { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Bollinger { period: usize, std_dev: f64 },
}

impl Indicator {
    pub fn kind(&self) -> IndicatorKind {
        match self {
            Self::Sma { .. } => IndicatorKind::Sma,
            Self::Ema { .. } => IndicatorKind::Ema,
            Self::Rsi { .. } => IndicatorKind::Rsi,
            Self::Macd { .. } => IndicatorKind::Macd,
            Self::Bollinger { .. } => IndicatorKind::Bollinger,
        }
    }

    /// Identifier encoding kind and parameters, e.g. `SMA_20` or `MACD_12_26_9`.
    pub fn name(&self) -> String {
        let kind = self.kind();
        match *self {
            Self::Sma { period } | Self::Ema { period } | Self::Rsi { period } => {
                format!("{kind}_{period}")
            }
            Self::Macd { fast, slow, signal } => format!("{kind}_{fast}_{slow}_{signal}"),
            Self::Bollinger { period, std_dev } => format!("{kind}_{period}_{std_dev}"),
        }
    }

    /// Reject non-positive spans, `fast >= slow` and a negative or
    /// non-finite band multiplier.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        match *self {
            Self::Sma { period } | Self::Ema { period } | Self::Rsi { period } => {
                ensure_period("period", period)
            }
            Self::Macd { fast, slow, signal } => {
                ensure_period("fast", fast)?;
                ensure_period("slow", slow)?;
                ensure_period("signal", signal)?;
                if fast >= slow {
                    return Err(AnalyticsError::invalid_parameter(format!(
                        "fast span ({fast}) must be smaller than slow span ({slow})"
                    )));
                }
                Ok(())
            }
            Self::Bollinger { period, std_dev } => {
                ensure_period("period", period)?;
                if !(std_dev.is_finite() && std_dev >= 0.0) {
                    return Err(AnalyticsError::invalid_parameter(format!(
                        "std_dev must be a non-negative number, got {std_dev}"
                    )));
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Indicator output, one variant per shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorOutput {
    Values { values: Vec<f64> },
    Macd(MacdSeries),
    Bollinger(BollingerBands),
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorResult {
    pub symbol: String,
    pub indicator: String,
    #[serde(flatten)]
    pub output: IndicatorOutput,
    pub timestamps: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsResult {
    pub symbol: String,
    pub mean_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub total_return: f64,
}

/// Per-period returns, aligned with bars `1..n`.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnsResult {
    pub symbol: String,
    pub values: Vec<f64>,
    pub timestamps: Vec<DateTime<Utc>>,
}

// =============================================================================
// Entry points
// =============================================================================

/// Compute `indicator` over the close prices of `series`.
///
/// Short series are not an error: positions without a full window carry 0.0.
/// An empty series is rejected.
pub fn compute_indicator(
    series: &TimeSeries,
    indicator: &Indicator,
) -> Result<IndicatorResult, AnalyticsError> {
    indicator.validate()?;
    ensure_len(series.len(), 1)?;

    let closes = series.closes();
    let output = match *indicator {
        Indicator::Sma { period } => IndicatorOutput::Values {
            values: calculate_sma(&closes, period),
        },
        Indicator::Ema { period } => IndicatorOutput::Values {
            values: calculate_ema(&closes, period),
        },
        Indicator::Rsi { period } => IndicatorOutput::Values {
            values: calculate_rsi(&closes, period),
        },
        Indicator::Macd { fast, slow, signal } => {
            IndicatorOutput::Macd(calculate_macd(&closes, fast, slow, signal))
        }
        Indicator::Bollinger { period, std_dev } => {
            IndicatorOutput::Bollinger(calculate_bollinger(&closes, period, std_dev))
        }
    };

    let name = indicator.name();
    debug!(symbol = %series.symbol(), indicator = %name, bars = closes.len(), "indicator computed");

    Ok(IndicatorResult {
        symbol: series.symbol().to_string(),
        indicator: name,
        output,
        timestamps: series.timestamps(),
    })
}

/// Summary statistics of the close-price path. Needs at least two bars.
pub fn compute_statistics(
    series: &TimeSeries,
    params: &StatisticsParams,
) -> Result<StatisticsResult, AnalyticsError> {
    params.validate()?;
    ensure_len(series.len(), 2)?;

    let closes = series.closes();
    let returns = calculate_returns(&closes);
    let ppy = params.periods_per_year;

    let result = StatisticsResult {
        symbol: series.symbol().to_string(),
        mean_return: annualized_mean_return(&returns, ppy),
        volatility: volatility(&returns, params.annualize, ppy),
        sharpe_ratio: sharpe_ratio(&returns, params.risk_free_rate, ppy),
        max_drawdown: max_drawdown(&returns),
        total_return: total_return(&closes).unwrap_or(0.0),
    };

    debug!(
        symbol = %result.symbol,
        bars = closes.len(),
        sharpe = result.sharpe_ratio,
        "statistics computed"
    );
    Ok(result)
}

/// Per-period simple returns. Needs at least two bars.
pub fn compute_returns(series: &TimeSeries) -> Result<ReturnsResult, AnalyticsError> {
    ensure_len(series.len(), 2)?;

    let values = calculate_returns(&series.closes());
    let timestamps = series.timestamps().into_iter().skip(1).collect();
    Ok(ReturnsResult {
        symbol: series.symbol().to_string(),
        values,
        timestamps,
    })
}

/// Pearson correlation of the close prices of two series.
pub fn compute_correlation(a: &TimeSeries, b: &TimeSeries) -> Result<f64, AnalyticsError> {
    let rho = pearson_correlation(&a.closes(), &b.closes())?;
    debug!(symbol_a = %a.symbol(), symbol_b = %b.symbol(), rho, "correlation computed");
    Ok(rho)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::bars_from_closes;

    const SAMPLE: [f64; 10] = [
        100.0, 102.0, 101.0, 105.0, 103.0, 108.0, 107.0, 110.0, 109.0, 112.0,
    ];

    fn series(closes: &[f64]) -> TimeSeries {
        TimeSeries::new("TEST", bars_from_closes(closes))
    }

    fn values(result: &IndicatorResult) -> &[f64] {
        match &result.output {
            IndicatorOutput::Values { values } => values,
            other => panic!("expected single series, got {other:?}"),
        }
    }

    // ---- naming & validation ---------------------------------------------

    #[test]
    fn indicator_names() {
        assert_eq!(Indicator::Sma { period: 20 }.name(), "SMA_20");
        assert_eq!(Indicator::Rsi { period: 14 }.name(), "RSI_14");
        assert_eq!(
            Indicator::Macd { fast: 12, slow: 26, signal: 9 }.name(),
            "MACD_12_26_9"
        );
        assert_eq!(
            Indicator::Bollinger { period: 20, std_dev: 2.5 }.name(),
            "BOLLINGER_20_2.5"
        );
    }

    #[test]
    fn zero_period_is_invalid() {
        let err = compute_indicator(&series(&SAMPLE), &Indicator::Ema { period: 0 }).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidParameter(_)));
    }

    #[test]
    fn macd_requires_fast_below_slow() {
        let macd = Indicator::Macd { fast: 26, slow: 12, signal: 9 };
        assert!(matches!(
            macd.validate(),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        let equal = Indicator::Macd { fast: 12, slow: 12, signal: 9 };
        assert!(equal.validate().is_err());
        let zero_signal = Indicator::Macd { fast: 3, slow: 5, signal: 0 };
        assert!(zero_signal.validate().is_err());
    }

    #[test]
    fn bollinger_rejects_negative_multiplier() {
        let bb = Indicator::Bollinger { period: 20, std_dev: -1.0 };
        assert!(bb.validate().is_err());
        let bb = Indicator::Bollinger { period: 20, std_dev: f64::NAN };
        assert!(bb.validate().is_err());
    }

    // ---- compute_indicator -------------------------------------------------

    #[test]
    fn sma_scenario() {
        let result = compute_indicator(&series(&SAMPLE), &Indicator::Sma { period: 3 }).unwrap();
        assert_eq!(result.symbol, "TEST");
        assert_eq!(result.indicator, "SMA_3");
        assert_eq!(result.timestamps.len(), SAMPLE.len());
        let v = values(&result);
        assert_eq!(v.len(), SAMPLE.len());
        assert_eq!(v[0], 0.0);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[2], 101.0);
    }

    #[test]
    fn bars_are_sorted_before_computing() {
        let mut bars = bars_from_closes(&SAMPLE);
        bars.reverse();
        let shuffled = TimeSeries::new("TEST", bars);
        let result = compute_indicator(&shuffled, &Indicator::Ema { period: 5 }).unwrap();
        assert_eq!(values(&result)[0], 100.0);
        assert!(result.timestamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn short_series_yields_placeholders() {
        let result = compute_indicator(&series(&[10.0, 11.0]), &Indicator::Sma { period: 20 }).unwrap();
        assert_eq!(values(&result), &[0.0, 0.0]);
    }

    #[test]
    fn empty_series_is_insufficient() {
        let err = compute_indicator(&series(&[]), &Indicator::Sma { period: 20 }).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn macd_output_shape() {
        let macd = Indicator::Macd { fast: 3, slow: 6, signal: 4 };
        let result = compute_indicator(&series(&SAMPLE), &macd).unwrap();
        match &result.output {
            IndicatorOutput::Macd(m) => {
                assert_eq!(m.macd_line.len(), SAMPLE.len());
                assert_eq!(m.histogram.len(), SAMPLE.len());
            }
            other => panic!("expected MACD output, got {other:?}"),
        }
    }

    #[test]
    fn bollinger_serialises_named_components() {
        let bb = Indicator::Bollinger { period: 3, std_dev: 2.0 };
        let result = compute_indicator(&series(&SAMPLE), &bb).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["indicator"], "BOLLINGER_3_2");
        assert_eq!(json["middle_band"][2], 101.0);
        assert_eq!(json["upper_band"].as_array().unwrap().len(), SAMPLE.len());
        assert!(json.get("values").is_none());
    }

    #[test]
    fn single_series_serialises_values_field() {
        let result = compute_indicator(&series(&SAMPLE), &Indicator::Rsi { period: 14 }).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["indicator"], "RSI_14");
        assert_eq!(json["values"].as_array().unwrap().len(), SAMPLE.len());
        assert_eq!(json["timestamps"][0], "2024-01-01T00:00:00Z");
    }

    // ---- compute_statistics ------------------------------------------------

    #[test]
    fn flat_series_statistics_are_zero() {
        let result = compute_statistics(&series(&[50.0; 20]), &StatisticsParams::default()).unwrap();
        assert_eq!(result.mean_return, 0.0);
        assert_eq!(result.volatility, 0.0);
        assert_eq!(result.sharpe_ratio, 0.0);
        assert_eq!(result.max_drawdown, 0.0);
        assert_eq!(result.total_return, 0.0);
    }

    #[test]
    fn two_bar_statistics() {
        let s = series(&[100.0, 110.0]);
        let result = compute_statistics(&s, &StatisticsParams::default()).unwrap();
        assert_eq!(result.total_return, 0.10);
        assert_eq!(result.volatility, 0.0);
        assert_eq!(result.sharpe_ratio, 0.0);
        assert!((result.mean_return - 0.10 * 252.0).abs() < 1e-12);

        let returns = compute_returns(&s).unwrap();
        assert_eq!(returns.values, vec![0.10]);
        assert_eq!(returns.timestamps.len(), 1);
        assert_eq!(returns.timestamps[0], s.timestamps()[1]);
    }

    #[test]
    fn single_bar_is_insufficient() {
        let err = compute_statistics(&series(&[100.0]), &StatisticsParams::default()).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
        assert!(compute_returns(&series(&[100.0])).is_err());
    }

    #[test]
    fn annualize_flag_only_scales_volatility() {
        let s = series(&SAMPLE);
        let on = compute_statistics(&s, &StatisticsParams::default()).unwrap();
        let off = compute_statistics(
            &s,
            &StatisticsParams {
                annualize: false,
                ..StatisticsParams::default()
            },
        )
        .unwrap();
        assert!((on.volatility - off.volatility * 252.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(on.mean_return, off.mean_return);
        assert_eq!(on.sharpe_ratio, off.sharpe_ratio);
        assert!(on.max_drawdown < 0.0);
        assert!((on.total_return - 0.12).abs() < 1e-12);
    }

    #[test]
    fn invalid_statistics_params() {
        let params = StatisticsParams {
            periods_per_year: -1.0,
            ..StatisticsParams::default()
        };
        assert!(matches!(
            compute_statistics(&series(&SAMPLE), &params),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    // ---- compute_correlation -----------------------------------------------

    #[test]
    fn correlation_with_itself() {
        let s = series(&SAMPLE);
        let rho = compute_correlation(&s, &s).unwrap();
        assert!((rho - 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_with_constant_fails() {
        let a = series(&SAMPLE);
        let b = series(&[7.0; 10]);
        assert_eq!(
            compute_correlation(&a, &b),
            Err(AnalyticsError::UndefinedCorrelation)
        );
    }

    // ---- properties --------------------------------------------------------

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn drawdown_never_positive(closes in prop::collection::vec(1.0f64..500.0, 2..60)) {
                let stats = compute_statistics(&series(&closes), &StatisticsParams::default()).unwrap();
                prop_assert!(stats.max_drawdown <= 0.0);
                prop_assert!(stats.max_drawdown >= -1.0);
            }

            #[test]
            fn total_return_matches_endpoints(closes in prop::collection::vec(1.0f64..500.0, 2..60)) {
                let stats = compute_statistics(&series(&closes), &StatisticsParams::default()).unwrap();
                let expected = closes[closes.len() - 1] / closes[0] - 1.0;
                prop_assert!((stats.total_return - expected).abs() <= 1e-12 * (1.0 + expected.abs()));
            }

            #[test]
            fn rising_path_has_no_drawdown(start in 1.0f64..100.0, steps in prop::collection::vec(0.0f64..5.0, 1..40)) {
                let mut closes = vec![start];
                for step in steps {
                    let last = closes[closes.len() - 1];
                    closes.push(last + step);
                }
                let stats = compute_statistics(&series(&closes), &StatisticsParams::default()).unwrap();
                prop_assert_eq!(stats.max_drawdown, 0.0);
            }

            #[test]
            fn self_correlation(closes in prop::collection::vec(1.0f64..500.0, 2..60)) {
                let s = series(&closes);
                match compute_correlation(&s, &s) {
                    Ok(rho) => prop_assert!((rho - 1.0).abs() < 1e-9),
                    Err(e) => prop_assert_eq!(e, AnalyticsError::UndefinedCorrelation),
                }
            }
        }
    }
}
