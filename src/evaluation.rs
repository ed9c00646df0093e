//! Accuracy metrics and the holdout backtest evaluator.
//!
//! Both forecasters are scored the same way: hold out the final stretch
//! of the training window, fit on the remainder, predict the held-out
//! span and compare against the real closes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::TrainingWindow;
use crate::error::Result;
use crate::models::{Deadline, Forecaster};

/// Forecast accuracy on a held-out tail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute error, in price units
    pub mae: f64,
    /// Root mean squared error, in price units
    pub rmse: f64,
    /// Mean absolute percentage error, in percent
    pub mape: f64,
}

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Root mean squared error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

/// Mean absolute percentage error. Zero-valued actuals are excluded from
/// the denominator set; if none remain the result is 0 rather than a
/// division by zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        if *a != 0.0 {
            sum += ((a - p) / a).abs();
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64) * 100.0
}

/// All three metrics for one actual/predicted pairing.
pub fn compute_metrics(actual: &[f64], predicted: &[f64]) -> AccuracyMetrics {
    AccuracyMetrics {
        mae: mae(actual, predicted),
        rmse: rmse(actual, predicted),
        mape: mape(actual, predicted),
    }
}

/// Score a forecaster by refitting it on the window minus a held-out
/// tail of `min(horizon, 20% of the window)` points and predicting that
/// tail. The model is left fitted on the shortened window; callers
/// refit on the full window before producing the real forecast.
pub fn evaluate_holdout<F: Forecaster>(
    model: &mut F,
    window: &TrainingWindow<'_>,
    horizon: usize,
    deadline: Option<Deadline>,
) -> Result<AccuracyMetrics> {
    let holdout = horizon.min(window.len() / 5).max(1);
    let head = window.head(holdout);

    model.fit(&head, deadline)?;
    let forecast = model.predict(holdout)?;

    let actual: Vec<f64> = window.tail(holdout).iter().map(|p| p.close).collect();
    let predicted = forecast.point_estimates();
    let metrics = compute_metrics(&actual, &predicted);

    debug!(
        kind = ?model.kind(),
        holdout,
        mae = metrics.mae,
        rmse = metrics.rmse,
        mape = metrics.mape,
        "holdout evaluation"
    );

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{load_series, RawRecord};
    use crate::models::{DecomposableForecaster, SequenceForecaster};
    use chrono::{Duration, NaiveDate};

    #[test]
    fn test_mae_rmse_basic() {
        let actual = vec![1.0, 2.0, 3.0];
        let predicted = vec![1.1, 2.0, 2.9];
        assert!((mae(&actual, &predicted) - 0.06666666666).abs() < 1e-9);
        assert!((rmse(&actual, &predicted) - (0.02f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_mape_excludes_zero_actuals() {
        let actual = vec![0.0, 100.0, 200.0];
        let predicted = vec![5.0, 110.0, 180.0];
        // The zero-actual point is skipped: (10% + 10%) / 2 = 10%.
        let value = mape(&actual, &predicted);
        assert!((value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_mape_all_zero_actuals_is_zero_not_nan() {
        let actual = vec![0.0, 0.0];
        let predicted = vec![1.0, 2.0];
        let value = mape(&actual, &predicted);
        assert_eq!(value, 0.0);
        assert!(value.is_finite());
    }

    fn linear_series(n: usize) -> crate::data::TimeSeries {
        let start: NaiveDate = "2023-01-02".parse().unwrap();
        let rows: Vec<RawRecord> = (0..n)
            .map(|i| RawRecord {
                date: start + Duration::days(i as i64),
                open: Some(100.0 + i as f64),
                high: Some(101.0 + i as f64),
                low: Some(99.0 + i as f64),
                close: Some(100.0 + i as f64),
                volume: Some(1_000.0),
            })
            .collect();
        load_series("TEST", rows, 1).unwrap()
    }

    #[test]
    fn test_holdout_near_zero_error_on_linear_trend() {
        // Both models track a pure linear trend almost exactly, so the
        // held-out tail error collapses toward zero.
        let series = linear_series(300);
        let window = series.full_window();

        let mut decomposable = DecomposableForecaster::default();
        let metrics = evaluate_holdout(&mut decomposable, &window, 10, None).unwrap();
        assert!(metrics.mae < 0.01, "decomposable MAE {}", metrics.mae);

        let mut sequence = SequenceForecaster::default();
        let metrics = evaluate_holdout(&mut sequence, &window, 10, None).unwrap();
        assert!(metrics.mae < 0.01, "sequence MAE {}", metrics.mae);
    }

    #[test]
    fn test_holdout_size_is_bounded_by_window_share() {
        // 100-point window, horizon 30: the holdout is capped at 20.
        let series = linear_series(100);
        let window = series.full_window();
        let mut model = DecomposableForecaster::default();
        let metrics = evaluate_holdout(&mut model, &window, 30, None).unwrap();
        assert!(metrics.mae.is_finite());
    }
}
