//! # market_forecast
//!
//! Dual-model price forecasting for equities, indices and crypto, with
//! technical indicators and cross-asset correlation analytics.
//!
//! ## Modules
//!
//! - `data` - loading and normalization of OHLCV histories
//! - `indicators` - SMA, EMA, RSI, MACD, Bollinger Bands, crossovers
//! - `models` - the decomposable (trend + seasonality) and sequence
//!   (recurrent) forecasters behind one `Forecaster` interface
//! - `evaluation` - MAE/RMSE/MAPE and the holdout backtest
//! - `correlation` - pairwise Pearson matrix, rolling correlation and
//!   the process-wide cached snapshot
//! - `engine` - per-request orchestration
//! - `universe` - supported asset metadata
//!
//! ## Quick start
//!
//! ```no_run
//! use market_forecast::{ForecastEngine, ForecastRequest};
//!
//! fn main() -> anyhow::Result<()> {
//!     // History rows come from the caller's market-data provider.
//!     let rows = market_forecast::data::load_records_csv("data/aapl.csv")?;
//!
//!     let engine = ForecastEngine::default();
//!     let request = ForecastRequest::new("AAPL", 14, 730);
//!     let response = engine.run(&request, rows)?;
//!
//!     if let Some(forecast) = response.decomposable.forecast() {
//!         for point in &forecast.points {
//!             println!("{}: {:.2}", point.date, point.point_estimate);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod correlation;
pub mod data;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod indicators;
pub mod models;
pub mod preprocessing;
pub mod universe;

pub use config::EngineConfig;
pub use correlation::{CorrelationCache, CorrelationConfig, CorrelationMatrix};
pub use data::{PricePoint, RawRecord, TimeSeries, TrainingWindow};
pub use engine::{ForecastEngine, ForecastRequest, ForecastResponse, ModelOutcome};
pub use error::{ForecastError, Result};
pub use evaluation::AccuracyMetrics;
pub use indicators::{IndicatorConfig, IndicatorRow};
pub use models::{
    DecomposableForecaster, Forecast, ForecastPoint, Forecaster, ModelKind, SequenceForecaster,
};
