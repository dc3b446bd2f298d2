//! Analytics error types.

use thiserror::Error;

/// Failures returned by the indicator and statistics engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Too few price points for the requested computation.
    #[error("insufficient data: need at least {required} price points, got {actual}")]
    InsufficientData {
        /// Minimum number of points required.
        required: usize,
        /// Number of points supplied.
        actual: usize,
    },

    /// One of the correlation inputs has zero variance.
    #[error("correlation is undefined: input series has zero variance")]
    UndefinedCorrelation,

    /// A period, span or scalar parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl AnalyticsError {
    #[must_use]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        AnalyticsError::InvalidParameter(msg.into())
    }

    /// Short machine-readable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "insufficient_data",
            Self::UndefinedCorrelation => "undefined_correlation",
            Self::InvalidParameter(_) => "invalid_parameter",
        }
    }
}

/// Require at least `required` points.
pub fn ensure_len(actual: usize, required: usize) -> Result<(), AnalyticsError> {
    if actual < required {
        return Err(AnalyticsError::InsufficientData { required, actual });
    }
    Ok(())
}

/// Require a window / span of at least one element.
pub fn ensure_period(name: &str, value: usize) -> Result<(), AnalyticsError> {
    if value == 0 {
        return Err(AnalyticsError::invalid_parameter(format!(
            "{name} must be a positive integer, got 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = AnalyticsError::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 2 price points, got 1"
        );
        assert_eq!(err.code(), "insufficient_data");
    }

    #[test]
    fn ensure_helpers() {
        assert!(ensure_len(2, 2).is_ok());
        assert_eq!(
            ensure_len(0, 1),
            Err(AnalyticsError::InsufficientData {
                required: 1,
                actual: 0
            })
        );
        assert!(ensure_period("period", 1).is_ok());
        assert!(matches!(
            ensure_period("period", 0),
            Err(AnalyticsError::InvalidParameter(msg)) if msg.contains("period")
        ));
    }
}
