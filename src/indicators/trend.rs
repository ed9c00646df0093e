//! Trend-following indicators.
//!
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//! - Bollinger Bands
//! - SMA crossover signals (golden / death cross)

use serde::{Deserialize, Serialize};

use super::util;

/// Simple moving average.
///
/// SMA = (P1 + P2 + ... + Pn) / n
///
/// # Example
/// ```
/// use market_forecast::indicators::sma;
/// let prices = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
/// let sma_3 = sma(&prices, 3);
/// assert_eq!(sma_3[2], 11.0); // (10 + 11 + 12) / 3
/// ```
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    util::rolling(data, period, util::mean)
}

/// Exponential moving average.
///
/// EMA = Price * k + EMA_prev * (1 - k), k = 2 / (period + 1).
/// The first value is seeded from the simple average of the first
/// `period` observations.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if data.is_empty() || period == 0 {
        return vec![];
    }
    if data.len() < period {
        return vec![f64::NAN; data.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = vec![f64::NAN; period - 1];

    let initial_sma: f64 = data[..period].iter().sum::<f64>() / period as f64;
    result.push(initial_sma);

    for i in period..data.len() {
        let prev_ema = result[i - 1];
        result.push(data[i] * k + prev_ema * (1.0 - k));
    }

    result
}

/// MACD output: line, signal and histogram, all date-aligned with the
/// input (NaN during warm-up).
#[derive(Debug, Clone)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD (Moving Average Convergence Divergence).
///
/// - MACD line = EMA(fast) - EMA(slow)
/// - Signal line = EMA(MACD line, signal_period), seeded from the first
///   valid stretch of the MACD line
/// - Histogram = MACD line - signal line
pub fn macd(
    data: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdResult {
    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(fast, slow)| fast - slow)
        .collect();

    // The MACD line starts with a NaN warm-up stretch; the signal EMA must
    // be seeded from the first valid value, not from the NaN prefix.
    let valid_start = macd_line.iter().position(|v| !v.is_nan());
    let signal_line: Vec<f64> = match valid_start {
        Some(start) => {
            let mut signal = vec![f64::NAN; start];
            signal.extend(ema(&macd_line[start..], signal_period));
            signal
        }
        None => vec![f64::NAN; macd_line.len()],
    };

    let histogram: Vec<f64> = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands output, date-aligned with the input.
#[derive(Debug, Clone)]
pub struct BollingerResult {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Bollinger Bands: middle = SMA(period), upper/lower = middle +/-
/// `num_std` rolling standard deviations.
pub fn bollinger(data: &[f64], period: usize, num_std: f64) -> BollingerResult {
    let middle = sma(data, period);
    let std = util::rolling(data, period, util::std_dev);

    let upper: Vec<f64> = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m + num_std * s)
        .collect();
    let lower: Vec<f64> = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| m - num_std * s)
        .collect();

    BollingerResult {
        upper,
        middle,
        lower,
    }
}

/// Direction of an SMA crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossDirection {
    /// Fast SMA crossed above the slow SMA (bullish)
    Golden,
    /// Fast SMA crossed below the slow SMA (bearish)
    Death,
}

/// A fast/slow SMA crossing at a given input index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossover {
    pub index: usize,
    pub direction: CrossDirection,
}

/// Detect golden/death crosses between a fast and a slow SMA.
pub fn sma_crossovers(data: &[f64], fast_period: usize, slow_period: usize) -> Vec<Crossover> {
    let fast = sma(data, fast_period);
    let slow = sma(data, slow_period);

    let mut crossings = Vec::new();
    let mut prev_spread: Option<f64> = None;

    for i in 0..data.len() {
        let spread = fast[i] - slow[i];
        if spread.is_nan() {
            continue;
        }
        if let Some(prev) = prev_spread {
            if prev <= 0.0 && spread > 0.0 {
                crossings.push(Crossover {
                    index: i,
                    direction: CrossDirection::Golden,
                });
            } else if prev >= 0.0 && spread < 0.0 {
                crossings.push(Crossover {
                    index: i,
                    direction: CrossDirection::Death,
                });
            }
        }
        prev_spread = Some(spread);
    }

    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeded_from_sma() {
        let data = vec![10.0, 11.0, 12.0, 13.0, 14.0];
        let result = ema(&data, 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_eq!(result[2], 11.0); // seed = SMA of first 3
        let k: f64 = 2.0 / 4.0;
        assert!((result[3] - (13.0 * k + 11.0 * (1.0 - k))).abs() < 1e-12);
    }

    #[test]
    fn test_macd_signal_warm_up_is_finite_afterwards() {
        let data: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let result = macd(&data, 12, 26, 9);
        assert_eq!(result.macd_line.len(), data.len());
        // MACD line valid from index 25, signal from index 25 + 8.
        assert!(result.macd_line[24].is_nan());
        assert!(!result.macd_line[25].is_nan());
        assert!(result.signal_line[32].is_nan());
        assert!(!result.signal_line[33].is_nan());
        for i in 33..data.len() {
            assert!(result.histogram[i].is_finite());
        }
    }

    #[test]
    fn test_bollinger_ordering() {
        let data: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.7).cos() * 3.0).collect();
        let bands = bollinger(&data, 20, 2.0);
        for i in 19..data.len() {
            assert!(bands.upper[i] >= bands.middle[i]);
            assert!(bands.middle[i] >= bands.lower[i]);
        }
    }

    #[test]
    fn test_crossovers_detected() {
        // Rising then falling series produces one golden and one death cross.
        let mut data: Vec<f64> = (0..60).map(|i| 100.0 - i as f64).collect();
        data.extend((0..80).map(|i| 40.0 + i as f64));
        data.extend((0..80).map(|i| 120.0 - i as f64));

        let crossings = sma_crossovers(&data, 5, 20);
        assert!(crossings
            .iter()
            .any(|c| c.direction == CrossDirection::Golden));
        assert!(crossings
            .iter()
            .any(|c| c.direction == CrossDirection::Death));
    }
}
