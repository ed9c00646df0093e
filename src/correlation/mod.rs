//! # Cross-asset correlation engine
//!
//! - `matrix` - Pearson coefficient and the full-period pair matrix
//! - `rolling` - sliding-window correlation for one pair
//! - `cache` - process-wide timestamped snapshot with atomic refresh

mod cache;
mod matrix;
mod rolling;

use serde::{Deserialize, Serialize};

pub use cache::CorrelationCache;
pub use matrix::{
    compute_matrix, pair_correlation, pearson, CorrelationEntry, CorrelationMatrix,
};
pub use rolling::{rolling_correlation, RollingPoint};

/// Correlation engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Minimum shared dates for a pair to enter the matrix
    pub min_overlap: usize,
    /// Rolling-correlation window in trading days
    pub rolling_window: usize,
    /// Minimum paired observations inside a rolling window
    pub rolling_min_observations: usize,
    /// Snapshot age after which the cached matrix counts as stale
    pub max_age_secs: u64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_overlap: 30,
            rolling_window: 30,
            rolling_min_observations: 10,
            max_age_secs: 3600,
        }
    }
}
