//! Per-request orchestration.
//!
//! One request trains both forecasters from scratch on the same
//! training window and computes the indicator table, then joins the
//! three results into a single response. The two model fits run on
//! scoped worker threads (they have no data dependency on each other)
//! while the indicator path runs on the request thread; the request
//! blocks until all three complete. Nothing is shared mutably between
//! concurrent requests.

use std::thread;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::data::{load_series, RawRecord, TimeSeries, TrainingWindow};
use crate::error::{ForecastError, Result};
use crate::evaluation::{evaluate_holdout, AccuracyMetrics};
use crate::indicators::{
    compute_table, crossover_events, CrossoverEvent, IndicatorConfig, IndicatorRow,
};
use crate::models::{
    Deadline, DecomposableForecaster, Forecast, Forecaster, SequenceForecaster,
};

/// A single forecast request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Asset symbol the history belongs to
    pub symbol: String,
    /// Days to forecast past the end of the history
    pub horizon: usize,
    /// Training-window length in calendar days
    pub training_days: usize,
    /// Per-request moving-average lookback; overrides the configured
    /// SMA/EMA windows when set
    #[serde(default)]
    pub indicator_period: Option<usize>,
}

impl ForecastRequest {
    /// Build a request.
    pub fn new(symbol: impl Into<String>, horizon: usize, training_days: usize) -> Self {
        Self {
            symbol: symbol.into(),
            horizon,
            training_days,
            indicator_period: None,
        }
    }

    /// Override the moving-average lookback for this request.
    pub fn with_indicator_period(mut self, period: usize) -> Self {
        self.indicator_period = Some(period);
        self
    }
}

/// Per-model slot in the response. One model failing does not void the
/// other's result; the failed slot carries the error instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    Completed {
        forecast: Forecast,
        metrics: AccuracyMetrics,
    },
    Failed {
        error: String,
    },
}

impl ModelOutcome {
    /// The forecast, when the model completed.
    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            ModelOutcome::Completed { forecast, .. } => Some(forecast),
            ModelOutcome::Failed { .. } => None,
        }
    }

    /// True when this slot carries a result.
    pub fn is_completed(&self) -> bool {
        matches!(self, ModelOutcome::Completed { .. })
    }
}

/// One historical observation echoed back for charting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// The assembled response for one forecast request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub symbol: String,
    pub historical: Vec<HistoricalPoint>,
    /// First date of the training window
    pub training_start_date: NaiveDate,
    pub decomposable: ModelOutcome,
    pub sequence: ModelOutcome,
    pub indicators: Vec<IndicatorRow>,
    pub crossovers: Vec<CrossoverEvent>,
}

/// The forecasting engine. Stateless across requests: every call trains
/// fresh models from the supplied history.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
}

impl ForecastEngine {
    /// An engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one forecast request over a raw history supplied by the
    /// caller's data provider.
    pub fn run(&self, request: &ForecastRequest, rows: Vec<RawRecord>) -> Result<ForecastResponse> {
        self.validate(request)?;

        let series = load_series(&request.symbol, rows, self.config.min_history())?;
        let window = series.trailing_window(request.training_days);
        let training_start_date = window.start_date().ok_or(ForecastError::InsufficientData {
            required: self.config.min_history(),
            actual: 0,
        })?;

        info!(
            symbol = %request.symbol,
            horizon = request.horizon,
            window = window.len(),
            "running forecast request"
        );

        let deadline = Deadline::after_ms(self.config.training_timeout_ms);
        let horizon = request.horizon;

        let (decomposable_result, sequence_result, indicators, crossovers) =
            thread::scope(|s| {
                let decomposable_task = s.spawn(|| {
                    let model = DecomposableForecaster::new(self.config.decomposable.clone());
                    run_model(model, &window, horizon, deadline)
                });
                let sequence_task = s.spawn(|| {
                    let model = SequenceForecaster::new(self.config.sequence.clone());
                    run_model(model, &window, horizon, deadline)
                });

                // The indicator path is independent of both models and runs
                // here while they train.
                let indicator_config = self.indicator_config(request);
                let indicators = compute_table(&series, &indicator_config);
                let crossovers = crossover_events(&series, &indicator_config);

                let decomposable = flatten_join(decomposable_task.join());
                let sequence = flatten_join(sequence_task.join());
                (decomposable, sequence, indicators, crossovers)
            });

        match (decomposable_result, sequence_result) {
            // Partial results keep their value; only a double failure
            // fails the request.
            (Err(decomposable_err), Err(sequence_err)) => {
                warn!(
                    symbol = %request.symbol,
                    %sequence_err,
                    "both forecasters failed"
                );
                Err(decomposable_err)
            }
            (decomposable, sequence) => Ok(ForecastResponse {
                symbol: request.symbol.clone(),
                historical: series
                    .points()
                    .iter()
                    .map(|p| HistoricalPoint {
                        date: p.date,
                        close: p.close,
                    })
                    .collect(),
                training_start_date,
                decomposable: into_outcome(decomposable, &request.symbol),
                sequence: into_outcome(sequence, &request.symbol),
                indicators,
                crossovers,
            }),
        }
    }

    /// Build the series the same way a request would, without running
    /// any model. Used by callers that only need indicators or
    /// correlation inputs.
    pub fn load(&self, symbol: &str, rows: Vec<RawRecord>) -> Result<TimeSeries> {
        load_series(symbol, rows, self.config.min_history())
    }

    fn indicator_config(&self, request: &ForecastRequest) -> IndicatorConfig {
        match request.indicator_period {
            Some(period) => IndicatorConfig {
                sma_period: period,
                ema_period: period,
                ..self.config.indicators.clone()
            },
            None => self.config.indicators.clone(),
        }
    }

    fn validate(&self, request: &ForecastRequest) -> Result<()> {
        if request.horizon < self.config.min_horizon || request.horizon > self.config.max_horizon {
            return Err(ForecastError::InvalidRequest(format!(
                "horizon {} outside supported range {}-{} days",
                request.horizon, self.config.min_horizon, self.config.max_horizon
            )));
        }
        if request.training_days == 0 {
            return Err(ForecastError::InvalidRequest(
                "training window must cover at least one day".to_string(),
            ));
        }
        if request.indicator_period == Some(0) {
            return Err(ForecastError::InvalidRequest(
                "indicator lookback must be at least one day".to_string(),
            ));
        }
        Ok(())
    }
}

/// Holdout-evaluate, refit on the full window, forecast.
fn run_model<F: Forecaster>(
    mut model: F,
    window: &TrainingWindow<'_>,
    horizon: usize,
    deadline: Deadline,
) -> Result<(Forecast, AccuracyMetrics)> {
    let metrics = evaluate_holdout(&mut model, window, horizon, Some(deadline))?;
    model.fit(window, Some(deadline))?;
    let forecast = model.predict(horizon)?;
    Ok((forecast, metrics))
}

fn flatten_join(
    joined: thread::Result<Result<(Forecast, AccuracyMetrics)>>,
) -> Result<(Forecast, AccuracyMetrics)> {
    match joined {
        Ok(result) => result,
        Err(_) => Err(ForecastError::ModelFit(
            "model worker panicked".to_string(),
        )),
    }
}

fn into_outcome(result: Result<(Forecast, AccuracyMetrics)>, symbol: &str) -> ModelOutcome {
    match result {
        Ok((forecast, metrics)) => ModelOutcome::Completed { forecast, metrics },
        Err(err) => {
            warn!(symbol, %err, "forecaster failed; returning degraded response");
            ModelOutcome::Failed {
                error: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn rows(n: usize, start: &str, f: impl Fn(usize) -> f64) -> Vec<RawRecord> {
        let start: NaiveDate = start.parse().unwrap();
        (0..n)
            .map(|i| {
                let close = f(i);
                RawRecord {
                    date: start + Duration::days(i as i64),
                    open: Some(close),
                    high: Some(close + 1.0),
                    low: Some(close - 1.0),
                    close: Some(close),
                    volume: Some(5_000.0),
                }
            })
            .collect()
    }

    #[test]
    fn test_full_request_round_trip() {
        let engine = ForecastEngine::default();
        let request = ForecastRequest::new("TEST", 10, 365);
        let history = rows(300, "2023-01-02", |i| {
            120.0 + i as f64 * 0.4 + (i as f64 * 0.21).sin() * 2.0
        });

        let response = engine.run(&request, history).unwrap();

        assert_eq!(response.historical.len(), 300);
        assert_eq!(response.indicators.len(), 300);
        assert!(response.decomposable.is_completed());
        assert!(response.sequence.is_completed());

        for outcome in [&response.decomposable, &response.sequence] {
            let forecast = outcome.forecast().unwrap();
            assert_eq!(forecast.points.len(), 10);
            let last_hist = response.historical.last().unwrap().date;
            assert_eq!(forecast.points[0].date, last_hist + Duration::days(1));
        }
    }

    #[test]
    fn test_training_start_date_reflects_window() {
        let engine = ForecastEngine::default();
        let request = ForecastRequest::new("TEST", 7, 100);
        let history = rows(300, "2023-01-02", |i| 100.0 + i as f64 * 0.2);

        let response = engine.run(&request, history).unwrap();
        let last: NaiveDate = "2023-01-02".parse::<NaiveDate>().unwrap() + Duration::days(299);
        assert_eq!(response.training_start_date, last - Duration::days(99));
    }

    #[test]
    fn test_partial_failure_keeps_other_model() {
        // A 70-day window clears the decomposable minimum but not the
        // sequence model's lookback requirement.
        let engine = ForecastEngine::default();
        let request = ForecastRequest::new("TEST", 7, 70);
        let history = rows(300, "2023-01-02", |i| 90.0 + i as f64 * 0.3);

        let response = engine.run(&request, history).unwrap();
        assert!(response.decomposable.is_completed());
        assert!(matches!(response.sequence, ModelOutcome::Failed { .. }));
    }

    #[test]
    fn test_both_models_failing_fails_the_request() {
        let engine = ForecastEngine::default();
        let request = ForecastRequest::new("TEST", 7, 20);
        let history = rows(300, "2023-01-02", |i| 90.0 + i as f64 * 0.3);

        let err = engine.run(&request, history).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit(_)));
    }

    #[test]
    fn test_horizon_bounds_validated() {
        let engine = ForecastEngine::default();
        let history = rows(300, "2023-01-02", |i| 90.0 + i as f64 * 0.3);

        let too_short = ForecastRequest::new("TEST", 3, 365);
        assert!(matches!(
            engine.run(&too_short, history.clone()).unwrap_err(),
            ForecastError::InvalidRequest(_)
        ));

        let too_long = ForecastRequest::new("TEST", 45, 365);
        assert!(matches!(
            engine.run(&too_long, history).unwrap_err(),
            ForecastError::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_indicator_period_override() {
        let engine = ForecastEngine::default();
        let request = ForecastRequest::new("TEST", 7, 365).with_indicator_period(10);
        let history = rows(200, "2023-06-01", |i| 75.0 + i as f64 * 0.25);

        let response = engine.run(&request, history).unwrap();
        // A 10-day SMA settles at row 9 instead of the default row 19.
        assert!(response.indicators[8].sma.is_none());
        assert!(response.indicators[9].sma.is_some());
    }

    #[test]
    fn test_zero_budget_times_out() {
        let config = EngineConfig::default().with_training_timeout_ms(0);
        let engine = ForecastEngine::new(config);
        let request = ForecastRequest::new("TEST", 10, 365);
        let history = rows(300, "2023-01-02", |i| 100.0 + i as f64 * 0.5);

        let err = engine.run(&request, history).unwrap_err();
        assert!(matches!(err, ForecastError::Timeout { .. }));
    }

    #[test]
    fn test_response_serializes_to_json() {
        let engine = ForecastEngine::default();
        let request = ForecastRequest::new("TEST", 7, 365);
        let history = rows(200, "2023-06-01", |i| 75.0 + i as f64 * 0.25);

        let response = engine.run(&request, history).unwrap();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"training_start_date\""));
        assert!(json.contains("\"status\":\"completed\""));
    }
}
