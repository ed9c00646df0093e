//! Shared helpers for indicator computation.
//!
//! Warm-up rows are represented as NaN internally; the table assembler
//! converts them to `None` at the payload boundary.

/// Apply an aggregation over a sliding window. The first `window - 1`
/// slots are NaN.
pub fn rolling<F>(data: &[f64], window: usize, func: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if data.len() < window || window == 0 {
        return vec![f64::NAN; data.len()];
    }

    let mut result = vec![f64::NAN; window - 1];
    for i in (window - 1)..data.len() {
        let slice = &data[(i + 1 - window)..=i];
        result.push(func(slice));
    }
    result
}

/// Arithmetic mean.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1 denominator, matching a typical
/// rolling-std implementation on daily closes).
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    let m = mean(data);
    let variance =
        data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    variance.sqrt()
}
