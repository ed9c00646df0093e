//! Process-wide cached correlation snapshot.
//!
//! The full matrix is expensive and not user-specific, so it is computed
//! on a cadence and shared. The cache holds an `Arc` to an immutable
//! snapshot and swaps it atomically on refresh: readers either see the
//! previous complete matrix (or nothing on cold start) - never a
//! partially updated one, and never block on a refresh they did not
//! trigger.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use super::matrix::{compute_matrix, CorrelationMatrix};
use crate::data::TimeSeries;

/// Shared, timestamped correlation-matrix cache.
#[derive(Debug)]
pub struct CorrelationCache {
    snapshot: RwLock<Option<Arc<CorrelationMatrix>>>,
    max_age: Duration,
}

impl CorrelationCache {
    /// An empty cache whose snapshots go stale after `max_age`.
    pub fn new(max_age: Duration) -> Self {
        Self {
            snapshot: RwLock::new(None),
            max_age,
        }
    }

    /// The current snapshot, if one has been computed. Cold starts
    /// return `None`; callers surface that as "not yet computed" rather
    /// than waiting.
    pub fn current(&self) -> Option<Arc<CorrelationMatrix>> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether the cached snapshot is missing or older than the
    /// configured maximum age.
    pub fn is_stale(&self) -> bool {
        match self.current() {
            None => true,
            Some(matrix) => {
                let age = Utc::now() - matrix.computed_at;
                age.to_std().map(|a| a > self.max_age).unwrap_or(true)
            }
        }
    }

    /// Recompute the matrix and swap it in. The computation runs outside
    /// the lock, so concurrent readers keep serving the previous
    /// snapshot until the single atomic swap at the end.
    pub fn refresh(&self, series: &[TimeSeries], min_overlap: usize) -> Arc<CorrelationMatrix> {
        let fresh = Arc::new(compute_matrix(series, min_overlap));
        info!(
            symbols = fresh.symbols.len(),
            entries = fresh.entries.len(),
            "correlation matrix refreshed"
        );

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::clone(&fresh));
        fresh
    }
}
