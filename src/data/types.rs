//! Core market-data types.
//!
//! A [`TimeSeries`] is an immutable, strictly ascending sequence of daily
//! [`PricePoint`]s for one symbol. Series are built by the loader
//! (`data::loader`) and owned by a single request pipeline; nothing in the
//! crate mutates a series after it is loaded.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single raw OHLCV row as delivered by a market-data provider.
///
/// Fields other than the date may be missing; the loader resolves gaps
/// before anything downstream sees the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: Option<f64>,
    /// Daily high
    pub high: Option<f64>,
    /// Daily low
    pub low: Option<f64>,
    /// Closing price
    pub close: Option<f64>,
    /// Traded volume
    pub volume: Option<f64>,
}

/// One cleaned daily observation.
///
/// Invariants (enforced by the loader): dates are unique and strictly
/// ascending within a series, and `close > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Daily high
    pub high: f64,
    /// Daily low
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

/// An ordered daily price history for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Asset symbol, e.g. "AAPL" or "BTC-USD"
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl TimeSeries {
    /// Build a series from already-validated points. Callers outside the
    /// loader should prefer [`crate::data::load_series`].
    pub(crate) fn from_points(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        debug_assert!(
            points.windows(2).all(|w| w[0].date < w[1].date),
            "series dates must be strictly ascending"
        );
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// All points in ascending date order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Date of the most recent observation.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Most recent closing price.
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// The trailing window covering the last `days` calendar days,
    /// used as the training span for both forecasters.
    ///
    /// The window is a contiguous suffix; its first date is recorded as
    /// the training start date for downstream display.
    pub fn trailing_window(&self, days: usize) -> TrainingWindow<'_> {
        let start = match self.points.last() {
            Some(last) => {
                let cutoff = last.date - Duration::days(days.saturating_sub(1) as i64);
                self.points.partition_point(|p| p.date < cutoff)
            }
            None => 0,
        };
        TrainingWindow {
            points: &self.points[start..],
        }
    }

    /// The whole series as a training window.
    pub fn full_window(&self) -> TrainingWindow<'_> {
        TrainingWindow {
            points: &self.points,
        }
    }
}

/// A contiguous suffix of a [`TimeSeries`] used to fit a forecaster.
#[derive(Debug, Clone, Copy)]
pub struct TrainingWindow<'a> {
    points: &'a [PricePoint],
}

impl<'a> TrainingWindow<'a> {
    /// Points inside the window.
    pub fn points(&self) -> &'a [PricePoint] {
        self.points
    }

    /// Number of observations in the window.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the window is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closing prices inside the window.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// First date of the window (`training_start_date` in responses).
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Last date of the window.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Last close inside the window.
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// A shorter window holding everything but the final `n` points.
    /// Used by the holdout evaluator.
    pub fn head(&self, n: usize) -> TrainingWindow<'a> {
        let keep = self.points.len().saturating_sub(n);
        TrainingWindow {
            points: &self.points[..keep],
        }
    }

    /// The final `n` points of the window.
    pub fn tail(&self, n: usize) -> &'a [PricePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}
