//! Normalization of raw provider rows into a clean [`TimeSeries`].
//!
//! Providers deliver histories with non-trading-day gaps, occasional
//! duplicate dates and missing fields. The loader sorts, deduplicates
//! (last write wins), drops rows without a usable close and fills the
//! remaining OHLC fields from the close when absent.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::types::{PricePoint, RawRecord, TimeSeries};
use crate::error::{ForecastError, Result};

/// Build a clean ascending series from raw provider rows.
///
/// Rows without a finite, positive close are discarded: a gap stays a gap,
/// it is never filled with fabricated prices. Duplicate dates resolve to
/// the last row seen. Fails with [`ForecastError::InsufficientData`] when
/// fewer than `min_points` usable observations remain.
pub fn load_series(
    symbol: impl Into<String>,
    rows: Vec<RawRecord>,
    min_points: usize,
) -> Result<TimeSeries> {
    let symbol = symbol.into();
    let total = rows.len();

    let mut by_date: BTreeMap<NaiveDate, RawRecord> = BTreeMap::new();
    for row in rows {
        by_date.insert(row.date, row);
    }

    let mut points = Vec::with_capacity(by_date.len());
    for (date, row) in by_date {
        let close = match row.close {
            Some(c) if c.is_finite() && c > 0.0 => c,
            _ => continue,
        };
        points.push(PricePoint {
            date,
            open: sanitize(row.open, close),
            high: sanitize(row.high, close),
            low: sanitize(row.low, close),
            close,
            volume: sanitize(row.volume, 0.0),
        });
    }

    debug!(
        symbol = %symbol,
        raw = total,
        usable = points.len(),
        "loaded price series"
    );

    if points.len() < min_points {
        return Err(ForecastError::InsufficientData {
            required: min_points,
            actual: points.len(),
        });
    }

    Ok(TimeSeries::from_points(symbol, points))
}

fn sanitize(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, close: Option<f64>) -> RawRecord {
        RawRecord {
            date: date.parse().unwrap(),
            open: close.map(|c| c - 0.5),
            high: close.map(|c| c + 1.0),
            low: close.map(|c| c - 1.0),
            close,
            volume: Some(1_000.0),
        }
    }

    #[test]
    fn test_sorts_and_deduplicates_last_wins() {
        let rows = vec![
            record("2024-01-03", Some(103.0)),
            record("2024-01-01", Some(101.0)),
            record("2024-01-02", Some(102.0)),
            record("2024-01-01", Some(111.0)), // duplicate, later row wins
        ];
        let series = load_series("TEST", rows, 3).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.points()[0].close, 111.0);
        assert_eq!(series.closes(), vec![111.0, 102.0, 103.0]);
    }

    #[test]
    fn test_drops_rows_without_close() {
        let mut rows: Vec<RawRecord> = (1..=28)
            .map(|d| record(&format!("2024-02-{d:02}"), Some(100.0 + d as f64)))
            .collect();
        rows.push(record("2024-02-29", None));
        rows.push(record("2024-03-01", Some(f64::NAN)));
        rows.push(record("2024-03-02", Some(-5.0)));

        let series = load_series("TEST", rows, 10).unwrap();
        assert_eq!(series.len(), 28);
        assert!(series.closes().iter().all(|c| c.is_finite() && *c > 0.0));
    }

    #[test]
    fn test_missing_fields_filled_from_close() {
        let mut rows: Vec<RawRecord> = (1..=9)
            .map(|d| record(&format!("2024-03-{d:02}"), Some(50.0)))
            .collect();
        rows.push(RawRecord {
            date: "2024-03-10".parse().unwrap(),
            open: None,
            high: None,
            low: None,
            close: Some(55.0),
            volume: None,
        });
        let series = load_series("TEST", rows, 10).unwrap();
        let last = series.points().last().unwrap();
        assert_eq!(last.open, 55.0);
        assert_eq!(last.high, 55.0);
        assert_eq!(last.low, 55.0);
        assert_eq!(last.volume, 0.0);
    }

    #[test]
    fn test_insufficient_data_at_floor() {
        // 59 usable points against a floor of 60 must fail.
        let start: NaiveDate = "2024-01-01".parse().unwrap();
        let rows: Vec<RawRecord> = (0..59)
            .map(|i| RawRecord {
                date: start + chrono::Duration::days(i),
                open: Some(100.0),
                high: Some(101.0),
                low: Some(99.0),
                close: Some(100.0),
                volume: Some(10.0),
            })
            .collect();
        let err = load_series("TEST", rows, 60).unwrap_err();
        match err {
            ForecastError::InsufficientData { required, actual } => {
                assert_eq!(required, 60);
                assert_eq!(actual, 59);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
