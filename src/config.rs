//! Engine configuration.
//!
//! The stated defaults (20/14/12/26/9-day indicator windows, 30-day
//! correlation window, 60-day sequence lookback, 7-30 day horizons) are
//! a reference configuration, not a frozen contract.

use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationConfig;
use crate::indicators::IndicatorConfig;
use crate::models::{DecomposableConfig, SequenceConfig};

/// Top-level configuration for the forecast engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shortest accepted forecast horizon, in days
    pub min_horizon: usize,
    /// Longest accepted forecast horizon, in days
    pub max_horizon: usize,
    /// Default training-window length, in calendar days (~2 years)
    pub default_training_days: usize,
    /// Wall-clock budget for model training per request, in milliseconds
    pub training_timeout_ms: u64,
    /// Indicator engine parameters
    pub indicators: IndicatorConfig,
    /// Decomposable forecaster parameters
    pub decomposable: DecomposableConfig,
    /// Sequence forecaster parameters
    pub sequence: SequenceConfig,
    /// Correlation engine parameters
    pub correlation: CorrelationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_horizon: 7,
            max_horizon: 30,
            default_training_days: 730,
            training_timeout_ms: 20_000,
            indicators: IndicatorConfig::default(),
            decomposable: DecomposableConfig::default(),
            sequence: SequenceConfig::default(),
            correlation: CorrelationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Minimum usable history the loader enforces: the longer of 60
    /// points or the largest indicator lookback plus 10.
    pub fn min_history(&self) -> usize {
        60.max(self.indicators.max_warmup() + 10)
    }

    /// Override the horizon bounds.
    pub fn with_horizon_bounds(mut self, min: usize, max: usize) -> Self {
        self.min_horizon = min;
        self.max_horizon = max;
        self
    }

    /// Override the training time budget.
    pub fn with_training_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.training_timeout_ms = timeout_ms;
        self
    }

    /// Override the indicator parameters.
    pub fn with_indicators(mut self, indicators: IndicatorConfig) -> Self {
        self.indicators = indicators;
        self
    }

    /// Override the sequence-model parameters.
    pub fn with_sequence(mut self, sequence: SequenceConfig) -> Self {
        self.sequence = sequence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_min_history_is_floor_60() {
        let config = EngineConfig::default();
        // Largest warm-up in the reference config is the 50-day
        // crossover SMA; 50 + 10 equals the 60-point floor.
        assert_eq!(config.min_history(), 60);
    }

    #[test]
    fn test_min_history_follows_large_lookbacks() {
        let indicators = IndicatorConfig {
            crossover_slow: 200,
            ..IndicatorConfig::default()
        };
        let config = EngineConfig::default().with_indicators(indicators);
        assert_eq!(config.min_history(), 210);
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::default()
            .with_horizon_bounds(5, 60)
            .with_training_timeout_ms(5_000);
        assert_eq!(config.min_horizon, 5);
        assert_eq!(config.max_horizon, 60);
        assert_eq!(config.training_timeout_ms, 5_000);
    }
}
