//! # Forecasting models
//!
//! Two complementary forecasters behind one capability interface:
//!
//! - `decomposable` - additive trend + seasonality extrapolation with a
//!   widening uncertainty interval
//! - `sequence` - recurrent model trained on normalized price changes,
//!   forecasting recursively
//!
//! Both implement [`Forecaster`] (`fit` on a training window, `predict`
//! a horizon), which lets the engine orchestrate them uniformly and run
//! them in parallel.

mod decomposable;
mod layers;
mod lstm;
mod sequence;

use std::time::Instant;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::TrainingWindow;
use crate::error::{ForecastError, Result};

pub use decomposable::{DecomposableConfig, DecomposableForecaster};
pub use layers::{Activation, Dense};
pub use lstm::LstmCell;
pub use sequence::{SequenceConfig, SequenceForecaster};

/// Which model produced a forecast. Closed set; adding a model kind is a
/// breaking change by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Trend + seasonality decomposition
    Decomposable,
    /// Recurrent sequence model
    Sequence,
}

/// A single forecast day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    /// Lower uncertainty bound; `None` for models without intervals
    pub lower_bound: Option<f64>,
    /// Upper uncertainty bound; `None` for models without intervals
    pub upper_bound: Option<f64>,
}

/// An ordered, contiguous-daily forecast strictly after the last
/// historical date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub model_kind: ModelKind,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Point estimates in horizon order.
    pub fn point_estimates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.point_estimate).collect()
    }
}

/// Wall-clock bound on training, carried into the models so a timeout
/// can report the configured budget.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    limit_ms: u64,
}

impl Deadline {
    /// A deadline `limit_ms` milliseconds from now.
    pub fn after_ms(limit_ms: u64) -> Self {
        Self {
            at: Instant::now() + std::time::Duration::from_millis(limit_ms),
            limit_ms,
        }
    }

    /// True once the budget is spent.
    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// The timeout error for this deadline.
    pub fn to_error(&self) -> ForecastError {
        ForecastError::Timeout {
            limit_ms: self.limit_ms,
        }
    }
}

/// Check an optional deadline, erroring once it has passed.
pub(crate) fn check_deadline(deadline: Option<Deadline>) -> Result<()> {
    match deadline {
        Some(d) if d.expired() => Err(d.to_error()),
        _ => Ok(()),
    }
}

/// Shared forecaster capability: fit fresh on a training window, then
/// predict a horizon. Models hold no state across requests; every
/// request trains from scratch.
pub trait Forecaster {
    /// Which model this is.
    fn kind(&self) -> ModelKind;

    /// Train on the window. `deadline` bounds wall-clock training time;
    /// implementations check it between phases and abort with
    /// [`crate::ForecastError::Timeout`] once passed.
    fn fit(&mut self, window: &TrainingWindow<'_>, deadline: Option<Deadline>) -> Result<()>;

    /// Forecast `horizon` days past the end of the fitted window.
    fn predict(&self, horizon: usize) -> Result<Forecast>;
}

/// The `horizon` calendar days immediately following `last_date`.
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as i64)
        .map(|d| last_date + Duration::days(d))
        .collect()
}
