//! Momentum oscillators.

/// RSI (Relative Strength Index) with Wilder's smoothing.
///
/// RSI = 100 - 100 / (1 + RS), RS = average gain / average loss. The
/// first value is seeded from the simple average of the first `period`
/// gains and losses, then both averages are smoothed exponentially with
/// factor 1 / period. When the average loss is zero, RSI is 100.
///
/// Output is date-aligned with the input; the first `period` slots are
/// NaN (warm-up).
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if data.len() < period + 1 {
        return vec![f64::NAN; data.len()];
    }

    let mut result = vec![f64::NAN; period];
    let mut gains = vec![0.0; data.len() - 1];
    let mut losses = vec![0.0; data.len() - 1];

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains[i - 1] = change;
        } else {
            losses[i - 1] = -change;
        }
    }

    let mut avg_gain: f64 = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss: f64 = losses[..period].iter().sum::<f64>() / period as f64;

    result.push(rsi_value(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period as f64 - 1.0) + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + losses[i]) / period as f64;
        result.push(rsi_value(avg_gain, avg_loss));
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_length_and_warm_up() {
        let data: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.9).sin()).collect();
        let result = rsi(&data, 14);
        assert_eq!(result.len(), data.len());
        for v in &result[..14] {
            assert!(v.is_nan());
        }
        for v in &result[14..] {
            assert!(*v >= 0.0 && *v <= 100.0);
        }
    }

    #[test]
    fn test_rsi_is_100_when_only_gains() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&data, 14);
        for v in &result[14..] {
            assert_eq!(*v, 100.0);
        }
    }

    #[test]
    fn test_rsi_is_low_when_only_losses() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 - i as f64 * 0.5).collect();
        let result = rsi(&data, 14);
        for v in &result[14..] {
            assert!(*v < 1.0);
        }
    }
}
