//! Date-aligned indicator table assembly.
//!
//! The engine returns one [`IndicatorRow`] per input point. Fields are
//! `None` during warm-up, never zero, so "no data yet" is distinguishable
//! from "value is zero". The computation is a pure function of the
//! series; nothing here mutates the input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::momentum::rsi;
use super::trend::{bollinger, macd, sma, sma_crossovers, CrossDirection};
use crate::data::TimeSeries;

/// Lookback parameters for the indicator engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Simple moving average window
    pub sma_period: usize,
    /// Exponential moving average window
    pub ema_period: usize,
    /// RSI window
    pub rsi_period: usize,
    /// MACD fast EMA window
    pub macd_fast: usize,
    /// MACD slow EMA window
    pub macd_slow: usize,
    /// MACD signal-line EMA window
    pub macd_signal: usize,
    /// Bollinger band window
    pub bollinger_period: usize,
    /// Bollinger band width in standard deviations
    pub bollinger_num_std: f64,
    /// Fast SMA for crossover signals
    pub crossover_fast: usize,
    /// Slow SMA for crossover signals
    pub crossover_slow: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_period: 20,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_num_std: 2.0,
            crossover_fast: 20,
            crossover_slow: 50,
        }
    }
}

impl IndicatorConfig {
    /// Longest warm-up any configured indicator needs before it produces
    /// a value. Drives the loader's minimum-history floor.
    pub fn max_warmup(&self) -> usize {
        let macd_warmup = self.macd_slow + self.macd_signal - 1;
        [
            self.sma_period,
            self.ema_period,
            self.rsi_period + 1,
            macd_warmup,
            self.bollinger_period,
            self.crossover_slow,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// One indicator observation, date-aligned 1:1 with the input series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_middle: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

/// A dated golden/death-cross event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub date: NaiveDate,
    pub direction: CrossDirection,
}

/// Compute the full indicator table for a series: exactly one row per
/// price point, same date order.
pub fn compute_table(series: &TimeSeries, config: &IndicatorConfig) -> Vec<IndicatorRow> {
    let closes = series.closes();

    let sma_values = sma(&closes, config.sma_period);
    let ema_values = super::trend::ema(&closes, config.ema_period);
    let rsi_values = rsi(&closes, config.rsi_period);
    let macd_result = macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal);
    let bands = bollinger(&closes, config.bollinger_period, config.bollinger_num_std);

    series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorRow {
            date: point.date,
            close: point.close,
            sma: finite(sma_values[i]),
            ema: finite(ema_values[i]),
            rsi: finite(rsi_values[i]),
            macd: finite(macd_result.macd_line[i]),
            macd_signal: finite(macd_result.signal_line[i]),
            macd_histogram: finite(macd_result.histogram[i]),
            bollinger_upper: finite(bands.upper[i]),
            bollinger_middle: finite(bands.middle[i]),
            bollinger_lower: finite(bands.lower[i]),
        })
        .collect()
}

/// Golden/death-cross events for the configured fast/slow SMA pair.
pub fn crossover_events(series: &TimeSeries, config: &IndicatorConfig) -> Vec<CrossoverEvent> {
    let closes = series.closes();
    sma_crossovers(&closes, config.crossover_fast, config.crossover_slow)
        .into_iter()
        .map(|c| CrossoverEvent {
            date: series.points()[c.index].date,
            direction: c.direction,
        })
        .collect()
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
