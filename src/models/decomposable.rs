//! Additive trend + seasonality forecaster.
//!
//! Fits a piecewise-linear trend (changepoints at fixed intervals over
//! the early part of the window), estimates day-of-week and monthly
//! additive offsets from the detrended residual, and extrapolates both
//! over the horizon. The uncertainty interval derives from the in-sample
//! residual standard deviation scaled by the square root of the horizon
//! step, so it widens with forecast distance.

use chrono::{Datelike, NaiveDate};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_deadline, future_dates, Deadline, Forecast, ForecastPoint, Forecaster, ModelKind};
use crate::data::TrainingWindow;
use crate::error::{ForecastError, Result};

/// Parameters of the decomposable model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecomposableConfig {
    /// Weekly seasonal period in observations
    pub weekly_period: usize,
    /// Spacing between trend changepoints, in observations
    pub changepoint_interval: usize,
    /// Fraction of the window eligible for changepoints
    pub changepoint_range: f64,
    /// Z multiplier for the uncertainty interval (1.96 for ~95%)
    pub interval_z: f64,
    /// Minimum training points
    pub min_points: usize,
    /// Minimum calendar span before a yearly component is estimated
    pub yearly_min_span_days: i64,
}

impl Default for DecomposableConfig {
    fn default() -> Self {
        Self {
            weekly_period: 7,
            changepoint_interval: 90,
            changepoint_range: 0.85,
            interval_z: 1.96,
            min_points: 30,
            yearly_min_span_days: 730,
        }
    }
}

/// Trend + seasonality forecaster with widening uncertainty bounds.
#[derive(Debug, Clone)]
pub struct DecomposableForecaster {
    config: DecomposableConfig,
    fitted: Option<FittedDecomposable>,
}

#[derive(Debug, Clone)]
struct FittedDecomposable {
    /// Regression coefficients: intercept, base slope, then one slope
    /// adjustment per changepoint
    coeffs: Vec<f64>,
    knots: Vec<f64>,
    /// Additive offset per weekday (Monday = 0)
    weekly: [f64; 7],
    /// Additive offset per calendar month, when the window is long enough
    monthly: Option<[f64; 12]>,
    /// In-sample residual standard deviation
    sigma: f64,
    /// Training length; the last observation sits at t = n - 1
    n: usize,
    last_date: NaiveDate,
    /// Shift aligning the fitted value at t = n - 1 with the last
    /// observed close, so the forecast continues from the actual price
    anchor: f64,
}

impl FittedDecomposable {
    fn trend_at(&self, t: f64) -> f64 {
        let mut value = self.coeffs[0] + self.coeffs[1] * t;
        for (delta, knot) in self.coeffs[2..].iter().zip(self.knots.iter()) {
            value += delta * (t - knot).max(0.0);
        }
        value
    }

    fn seasonal_at(&self, date: NaiveDate) -> f64 {
        let weekday = date.weekday().num_days_from_monday() as usize;
        let mut value = self.weekly[weekday];
        if let Some(monthly) = &self.monthly {
            value += monthly[date.month0() as usize];
        }
        value
    }
}

impl DecomposableForecaster {
    /// Create a forecaster with the given parameters.
    pub fn new(config: DecomposableConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    /// Changepoint positions for a window of length `n`.
    fn knots(&self, n: usize) -> Vec<f64> {
        let limit = n as f64 * self.config.changepoint_range;
        (1..)
            .map(|j| (j * self.config.changepoint_interval) as f64)
            .take_while(|k| *k < limit)
            .collect()
    }
}

impl Default for DecomposableForecaster {
    fn default() -> Self {
        Self::new(DecomposableConfig::default())
    }
}

impl Forecaster for DecomposableForecaster {
    fn kind(&self) -> ModelKind {
        ModelKind::Decomposable
    }

    fn fit(&mut self, window: &TrainingWindow<'_>, deadline: Option<Deadline>) -> Result<()> {
        check_deadline(deadline)?;

        let points = window.points();
        let n = points.len();
        let required = self.config.min_points.max(2 * self.config.weekly_period);
        if n < required {
            return Err(ForecastError::ModelFit(format!(
                "training window too short for decomposition: {n} points, {required} required"
            )));
        }

        let closes = window.closes();
        if closes.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::ModelFit(
                "NaN in training data".to_string(),
            ));
        }

        // Piecewise-linear trend: y ~ intercept + slope * t + sum of
        // hinge terms at the changepoints, solved by least squares.
        let knots = self.knots(n);
        let ncols = 2 + knots.len();
        let design = DMatrix::from_fn(n, ncols, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => (i as f64 - knots[j - 2]).max(0.0),
        });
        let y = DVector::from_vec(closes.clone());

        let svd = design.svd(true, true);
        let beta = svd
            .solve(&y, 1e-12)
            .map_err(|e| ForecastError::ModelFit(format!("trend regression failed: {e}")))?;
        let coeffs: Vec<f64> = beta.iter().cloned().collect();
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::ModelFit(
                "degenerate trend fit produced non-finite coefficients".to_string(),
            ));
        }

        check_deadline(deadline)?;

        let partial = FittedDecomposable {
            coeffs,
            knots,
            weekly: [0.0; 7],
            monthly: None,
            sigma: 0.0,
            n,
            last_date: points[n - 1].date,
            anchor: 0.0,
        };

        // Day-of-week offsets from the detrended residual. Trading-day
        // series usually leave weekend slots empty; those stay at zero.
        let detrended: Vec<f64> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| c - partial.trend_at(i as f64))
            .collect();

        let mut weekly = [0.0; 7];
        {
            let mut sums = [0.0; 7];
            let mut counts = [0usize; 7];
            for (point, &r) in points.iter().zip(detrended.iter()) {
                let w = point.date.weekday().num_days_from_monday() as usize;
                sums[w] += r;
                counts[w] += 1;
            }
            let mut represented = 0.0;
            let mut total = 0.0;
            for w in 0..7 {
                if counts[w] > 0 {
                    weekly[w] = sums[w] / counts[w] as f64;
                    total += weekly[w];
                    represented += 1.0;
                }
            }
            // Center so the seasonal component carries no trend.
            if represented > 0.0 {
                let offset = total / represented;
                for (w, value) in weekly.iter_mut().enumerate() {
                    if counts[w] > 0 {
                        *value -= offset;
                    }
                }
            }
        }

        let deweekly: Vec<f64> = points
            .iter()
            .zip(detrended.iter())
            .map(|(p, &r)| r - weekly[p.date.weekday().num_days_from_monday() as usize])
            .collect();

        // Monthly (yearly-scale) offsets only when the window spans
        // enough calendar time to see each month more than once.
        let span_days = (points[n - 1].date - points[0].date).num_days();
        let monthly = if span_days >= self.config.yearly_min_span_days {
            let mut sums = [0.0; 12];
            let mut counts = [0usize; 12];
            for (point, &r) in points.iter().zip(deweekly.iter()) {
                let m = point.date.month0() as usize;
                sums[m] += r;
                counts[m] += 1;
            }
            let mut offsets = [0.0; 12];
            let mut represented = 0.0;
            let mut total = 0.0;
            for m in 0..12 {
                if counts[m] > 0 {
                    offsets[m] = sums[m] / counts[m] as f64;
                    total += offsets[m];
                    represented += 1.0;
                }
            }
            if represented > 0.0 {
                let offset = total / represented;
                for (m, value) in offsets.iter_mut().enumerate() {
                    if counts[m] > 0 {
                        *value -= offset;
                    }
                }
            }
            Some(offsets)
        } else {
            None
        };

        let mut fitted = FittedDecomposable {
            weekly,
            monthly,
            ..partial
        };

        let residuals: Vec<f64> = points
            .iter()
            .enumerate()
            .map(|(i, p)| p.close - fitted.trend_at(i as f64) - fitted.seasonal_at(p.date))
            .collect();
        let mean = residuals.iter().sum::<f64>() / n as f64;
        let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n as f64;
        fitted.sigma = variance.sqrt();

        // Continuity with the observed series: shift the model so its
        // value at the last training day equals the last close.
        let last = &points[n - 1];
        fitted.anchor =
            last.close - fitted.trend_at((n - 1) as f64) - fitted.seasonal_at(last.date);

        debug!(
            n,
            knots = fitted.knots.len(),
            sigma = fitted.sigma,
            yearly = fitted.monthly.is_some(),
            "decomposable model fitted"
        );

        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or_else(|| {
            ForecastError::ModelFit("model not fitted; call fit() first".to_string())
        })?;

        let dates = future_dates(fitted.last_date, horizon);
        let points = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let step = (i + 1) as f64;
                let t = (fitted.n - 1) as f64 + step;
                let estimate = fitted.trend_at(t) + fitted.seasonal_at(date) + fitted.anchor;
                let half_width = self.config.interval_z * fitted.sigma * step.sqrt();
                ForecastPoint {
                    date,
                    point_estimate: estimate.max(0.0),
                    lower_bound: Some((estimate - half_width).max(0.0)),
                    upper_bound: Some((estimate + half_width).max(0.0)),
                }
            })
            .collect();

        Ok(Forecast {
            model_kind: ModelKind::Decomposable,
            points,
        })
    }
}
