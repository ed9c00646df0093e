//! Pearson correlation and the full cross-asset matrix.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};

/// Pearson correlation coefficient of two equally long samples.
///
/// r = [n * sum(xy) - sum(x) * sum(y)] /
///     sqrt([n * sum(x^2) - sum(x)^2] * [n * sum(y^2) - sum(y)^2])
///
/// Returns 0 when either series has no variance (denominator zero), so a
/// constant price series correlates to 0 by convention instead of
/// producing NaN.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        sum_x += xi;
        sum_y += yi;
        sum_xy += xi * yi;
        sum_x2 += xi * xi;
        sum_y2 += yi * yi;
    }

    let numerator = n_f * sum_xy - sum_x * sum_y;
    let denominator =
        ((n_f * sum_x2 - sum_x * sum_x) * (n_f * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        (numerator / denominator).clamp(-1.0, 1.0)
    }
}

/// Full-period correlation of one pair, aligned on shared dates.
///
/// The on-demand counterpart of the matrix: where the matrix silently
/// omits thin pairs, this surfaces the misalignment as
/// [`ForecastError::Alignment`] so the caller can explain it.
pub fn pair_correlation(a: &TimeSeries, b: &TimeSeries, min_overlap: usize) -> Result<f64> {
    let by_date: BTreeMap<NaiveDate, f64> =
        b.points().iter().map(|p| (p.date, p.close)).collect();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for point in a.points() {
        if let Some(&close_b) = by_date.get(&point.date) {
            xs.push(point.close);
            ys.push(close_b);
        }
    }

    if xs.len() < min_overlap {
        return Err(ForecastError::Alignment {
            symbol_x: a.symbol.clone(),
            symbol_y: b.symbol.clone(),
            overlap: xs.len(),
            required: min_overlap,
        });
    }

    Ok(pearson(&xs, &ys))
}

/// One unordered pair in the matrix. `(x, y)` and `(y, x)` describe the
/// same entry; self-pairs are never emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub symbol_x: String,
    pub symbol_y: String,
    pub value: f64,
}

/// A full-period correlation snapshot over the asset universe. Swapped
/// atomically by the cache; readers never observe a partial matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Symbols that contributed at least one entry
    pub symbols: Vec<String>,
    /// One entry per unordered pair with enough shared history
    pub entries: Vec<CorrelationEntry>,
    /// When this snapshot was computed
    pub computed_at: DateTime<Utc>,
}

impl CorrelationMatrix {
    /// Look up a pair in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| {
                (e.symbol_x == a && e.symbol_y == b) || (e.symbol_x == b && e.symbol_y == a)
            })
            .map(|e| e.value)
    }
}

/// Compute the full-period matrix across a set of series.
///
/// Each pair is aligned on shared dates only (inner join); pairs with
/// fewer than `min_overlap` shared observations are omitted rather than
/// failing the whole matrix.
pub fn compute_matrix(series: &[TimeSeries], min_overlap: usize) -> CorrelationMatrix {
    let indexed: Vec<(&str, BTreeMap<NaiveDate, f64>)> = series
        .iter()
        .map(|s| {
            let by_date: BTreeMap<NaiveDate, f64> =
                s.points().iter().map(|p| (p.date, p.close)).collect();
            (s.symbol.as_str(), by_date)
        })
        .collect();

    let mut entries = Vec::new();
    for i in 0..indexed.len() {
        for j in (i + 1)..indexed.len() {
            let (sym_a, map_a) = &indexed[i];
            let (sym_b, map_b) = &indexed[j];

            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (date, &close_a) in map_a {
                if let Some(&close_b) = map_b.get(date) {
                    xs.push(close_a);
                    ys.push(close_b);
                }
            }

            if xs.len() < min_overlap {
                debug!(
                    a = sym_a,
                    b = sym_b,
                    overlap = xs.len(),
                    min_overlap,
                    "pair omitted from correlation matrix"
                );
                continue;
            }

            entries.push(CorrelationEntry {
                symbol_x: sym_a.to_string(),
                symbol_y: sym_b.to_string(),
                value: pearson(&xs, &ys),
            });
        }
    }

    let mut symbols: Vec<String> = Vec::new();
    for entry in &entries {
        if !symbols.contains(&entry.symbol_x) {
            symbols.push(entry.symbol_x.clone());
        }
        if !symbols.contains(&entry.symbol_y) {
            symbols.push(entry.symbol_y.clone());
        }
    }

    CorrelationMatrix {
        symbols,
        entries,
        computed_at: Utc::now(),
    }
}
