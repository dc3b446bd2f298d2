// =============================================================================
// Shared types used across the analytics service
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(with = "flexible_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Check the bar invariants: open/high/low/close > 0 and volume >= 0.
    ///
    /// Returns a human-readable reason on failure. NaN fails every check.
    pub fn check(&self) -> Result<(), String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{field} must be a positive number, got {value}"));
            }
        }
        if !(self.volume.is_finite() && self.volume >= 0.0) {
            return Err(format!("volume must be non-negative, got {}", self.volume));
        }
        Ok(())
    }
}

/// An ordered series of bars for one symbol.
///
/// Construction through [`TimeSeries::new`] sorts the bars ascending by
/// timestamp. The sort is stable, so bars sharing a timestamp keep their
/// input order and are never deduplicated.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl TimeSeries {
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Close-price projection, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Timestamps aligned index-for-index with [`TimeSeries::closes`].
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }
}

// =============================================================================
// Timestamp parsing
// =============================================================================

/// Accepts RFC 3339 (with offset) or a naive ISO-8601 date-time, which is
/// taken as UTC. Serialises like any other `DateTime<Utc>`.
pub mod flexible_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ts.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unparseable timestamp: {raw}")))
    }
}
