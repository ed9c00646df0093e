//! Min-max scaling for model inputs.
//!
//! Statistics are derived only from the data passed to [`MinMaxNormalizer::fit`]
//! (the training window) and reused for every later transform, so
//! validation and future values never leak into the scaling.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Min-max normalizer mapping the fitted range onto [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxNormalizer {
    min: f64,
    max: f64,
}

impl MinMaxNormalizer {
    /// Fit the scaling range on training data.
    pub fn fit(data: &[f64]) -> Result<Self> {
        if data.is_empty() {
            return Err(ForecastError::ModelFit(
                "cannot fit normalizer on empty data".to_string(),
            ));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(
                "NaN or infinite value in training data".to_string(),
            ));
        }

        let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Ok(Self { min, max })
    }

    /// Scale a single value into [0, 1]. A degenerate (constant) fit maps
    /// everything to 0.5.
    pub fn transform_one(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            0.5
        } else {
            (value - self.min) / range
        }
    }

    /// Scale a slice into [0, 1].
    pub fn transform(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&v| self.transform_one(v)).collect()
    }

    /// Map a normalized value back into the original units.
    pub fn inverse_one(&self, value: f64) -> f64 {
        self.min + value * (self.max - self.min)
    }

    /// Fitted lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Fitted upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }
}
