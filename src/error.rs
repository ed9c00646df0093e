//! Error types for the forecasting engine.

use thiserror::Error;

/// Errors produced by the forecasting and analytics engine.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Not enough history for the requested operation. Surfaced to the
    /// caller as a "choose a longer period or different asset" condition;
    /// never silently padded with fabricated data.
    #[error("insufficient data: required {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Numerical fitting failure (degenerate series, NaN in training data,
    /// window too short for the model). Retryable for this request only.
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// Correlation requested on a pair without enough shared dates.
    #[error(
        "insufficient date overlap between {symbol_x} and {symbol_y}: \
         {overlap} shared points, {required} required"
    )]
    Alignment {
        symbol_x: String,
        symbol_y: String,
        overlap: usize,
        required: usize,
    },

    /// Training exceeded the request-level time budget. Distinct from
    /// `ModelFit` so callers can retry with a shorter window.
    #[error("training exceeded the time budget of {limit_ms} ms")]
    Timeout { limit_ms: u64 },

    /// Request parameters outside the supported bounds.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForecastError::InsufficientData {
            required: 60,
            actual: 59,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: required 60 points, got 59"
        );
    }

    #[test]
    fn test_timeout_distinct_from_fit_failure() {
        let timeout = ForecastError::Timeout { limit_ms: 20_000 };
        let fit = ForecastError::ModelFit("NaN in training data".to_string());
        assert!(matches!(timeout, ForecastError::Timeout { .. }));
        assert!(matches!(fit, ForecastError::ModelFit(_)));
    }
}
