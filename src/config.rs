// =============================================================================
// Service Configuration: JSON file with environment overrides
// =============================================================================
//
// Every field carries a serde default so that an empty, partial or older
// config file still loads. Query parameters on individual requests override
// the indicator and statistics defaults held here.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::statistics::StatisticsParams;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "quant_config.json";

/// Upper bound on the JSON size of one serialised bar.
const MAX_BAR_BYTES: usize = 512;

/// Room for the symbol, field names and whitespace around the bars.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_max_bars() -> usize {
    100_000
}

fn default_ma_period() -> usize {
    20
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bollinger_std_dev() -> f64 {
    2.0
}

// =============================================================================
// IndicatorDefaults
// =============================================================================

/// Parameters used when a request does not supply its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorDefaults {
    #[serde(default = "default_ma_period")]
    pub sma_period: usize,

    #[serde(default = "default_ma_period")]
    pub ema_period: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_ma_period")]
    pub bollinger_period: usize,

    /// Band multiplier k.
    #[serde(default = "default_bollinger_std_dev")]
    pub bollinger_std_dev: f64,
}

impl Default for IndicatorDefaults {
    fn default() -> Self {
        Self {
            sma_period: default_ma_period(),
            ema_period: default_ma_period(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_period: default_ma_period(),
            bollinger_std_dev: default_bollinger_std_dev(),
        }
    }
}

// =============================================================================
// ServiceConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Requests carrying more bars than this are rejected.
    #[serde(default = "default_max_bars")]
    pub max_bars: usize,

    #[serde(default)]
    pub indicators: IndicatorDefaults,

    #[serde(default)]
    pub statistics: StatisticsParams,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_bars: default_max_bars(),
            indicators: IndicatorDefaults::default(),
            statistics: StatisticsParams::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            max_bars = config.max_bars,
            "service config loaded"
        );

        Ok(config)
    }

    /// Request body limit large enough for two series of `max_bars` bars
    /// each, so oversized requests reach the bar-count check.
    pub fn body_limit_bytes(&self) -> usize {
        self.max_bars
            .saturating_mul(2 * MAX_BAR_BYTES)
            .saturating_add(BODY_OVERHEAD_BYTES)
    }

    /// Apply `QUANT_BIND_ADDR` if set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("QUANT_BIND_ADDR") {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }
    }
}
