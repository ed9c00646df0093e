//! Rolling-window correlation for one asset pair.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::matrix::pearson;
use crate::data::TimeSeries;

/// One point of a rolling correlation: `None` until the window holds
/// enough paired observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Rolling correlation over the union of both series' dates.
///
/// The window slides one date at a time across every date either series
/// traded on. A date present in only one series contributes no paired
/// observation but does not break window continuity for the other. A
/// value is emitted only when at least `min_observations` paired points
/// fall inside the window.
pub fn rolling_correlation(
    a: &TimeSeries,
    b: &TimeSeries,
    window: usize,
    min_observations: usize,
) -> Vec<RollingPoint> {
    let closes_a: BTreeMap<NaiveDate, f64> =
        a.points().iter().map(|p| (p.date, p.close)).collect();
    let closes_b: BTreeMap<NaiveDate, f64> =
        b.points().iter().map(|p| (p.date, p.close)).collect();

    let dates: Vec<NaiveDate> = closes_a
        .keys()
        .chain(closes_b.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut result = Vec::with_capacity(dates.len());
    for (i, &date) in dates.iter().enumerate() {
        if window == 0 || i + 1 < window {
            result.push(RollingPoint { date, value: None });
            continue;
        }

        let mut xs = Vec::with_capacity(window);
        let mut ys = Vec::with_capacity(window);
        for &d in &dates[i + 1 - window..=i] {
            if let (Some(&x), Some(&y)) = (closes_a.get(&d), closes_b.get(&d)) {
                xs.push(x);
                ys.push(y);
            }
        }

        let value = if xs.len() >= min_observations.max(2) {
            Some(pearson(&xs, &ys))
        } else {
            None
        };
        result.push(RollingPoint { date, value });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{load_series, RawRecord};
    use chrono::Duration;

    fn series(symbol: &str, closes: &[f64], start: &str) -> TimeSeries {
        let start: NaiveDate = start.parse().unwrap();
        let rows: Vec<RawRecord> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| RawRecord {
                date: start + Duration::days(i as i64),
                open: Some(close),
                high: Some(close + 1.0),
                low: Some(close - 1.0),
                close: Some(close),
                volume: Some(100.0),
            })
            .collect();
        load_series(symbol, rows, 1).unwrap()
    }

    #[test]
    fn test_output_covers_date_union() {
        let a_closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let b_closes: Vec<f64> = (0..50).map(|i| 50.0 + i as f64).collect();
        // b starts 10 days later: the union spans 60 dates.
        let a = series("AAA", &a_closes, "2024-01-01");
        let b = series("BBB", &b_closes, "2024-01-11");

        let result = rolling_correlation(&a, &b, 30, 10);
        assert_eq!(result.len(), 60);
    }

    #[test]
    fn test_warm_up_and_populated_values() {
        let a_closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + i as f64 + (i as f64 * 0.5).sin())
            .collect();
        let b_closes: Vec<f64> = (0..80)
            .map(|i| 40.0 + i as f64 * 0.8 + (i as f64 * 0.3).cos())
            .collect();
        let a = series("AAA", &a_closes, "2024-01-01");
        let b = series("BBB", &b_closes, "2024-01-01");

        let result = rolling_correlation(&a, &b, 30, 10);
        for point in &result[..29] {
            assert!(point.value.is_none());
        }
        for point in &result[29..] {
            let value = point.value.expect("window is full");
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_five_shared_dates_never_emit() {
        // Only 5 overlapping dates against a window of 30: every rolling
        // value stays None because the window population never reaches
        // the minimum.
        let a_closes: Vec<f64> = (0..40).map(|i| 10.0 + i as f64).collect();
        let b_closes: Vec<f64> = (0..40).map(|i| 90.0 - i as f64).collect();
        let a = series("AAA", &a_closes, "2024-01-01");
        let b = series("BBB", &b_closes, "2024-02-05"); // overlap: Feb 5-9

        let result = rolling_correlation(&a, &b, 30, 10);
        assert!(result.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn test_gap_in_one_series_keeps_continuity() {
        // b is missing a block in the middle; windows spanning the gap
        // still emit once enough paired observations remain.
        let a_closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let a = series("AAA", &a_closes, "2024-01-01");

        let start: NaiveDate = "2024-01-01".parse().unwrap();
        let rows: Vec<RawRecord> = (0..60)
            .filter(|i| !(20..30).contains(i))
            .map(|i| RawRecord {
                date: start + Duration::days(i as i64),
                open: Some(50.0),
                high: Some(51.0),
                low: Some(49.0),
                close: Some(50.0 + i as f64 * 0.5),
                volume: Some(100.0),
            })
            .collect();
        let b = load_series("BBB", rows, 1).unwrap();

        let result = rolling_correlation(&a, &b, 30, 10);
        let populated = result.iter().filter(|p| p.value.is_some()).count();
        assert!(populated > 0);
    }
}
