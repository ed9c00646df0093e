//! Recurrent sequence forecaster.
//!
//! Trains on sliding windows of normalized close-to-close differences
//! and forecasts recursively: each predicted step is appended to the
//! input window to predict the next one. That autoregressive feedback is
//! an inherent property of the model, not a defect - errors made early
//! in the horizon compound through the remaining steps, which is why the
//! model reports no uncertainty interval rather than a misleading one.
//!
//! Architecture: one LSTM layer used as a sequence encoder plus a linear
//! readout. Only the readout is trained (plain SGD on the analytic
//! gradient of the squared error); the recurrent weights stay at their
//! random initialization. Training cost is therefore one encoding pass
//! over the window plus a few cheap epochs on the readout, which keeps
//! per-request latency interactive.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layers::{Activation, Dense};
use super::lstm::LstmCell;
use super::{check_deadline, future_dates, Deadline, Forecast, ForecastPoint, Forecaster, ModelKind};
use crate::data::TrainingWindow;
use crate::error::{ForecastError, Result};
use crate::preprocessing::{build_sequences, MinMaxNormalizer};

/// Parameters of the sequence model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Input window length in trading days
    pub lookback: usize,
    /// Hidden-state width of the recurrent encoder
    pub hidden_size: usize,
    /// Readout training epochs
    pub epochs: usize,
    /// Readout learning rate
    pub learning_rate: f64,
    /// Minimum number of training sequences beyond the lookback
    pub min_training_sequences: usize,
    /// RNG seed for weight initialization, fixed for reproducible runs
    pub seed: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            lookback: 60,
            hidden_size: 32,
            epochs: 30,
            learning_rate: 0.05,
            min_training_sequences: 30,
            seed: 42,
        }
    }
}

/// LSTM-style forecaster over normalized price differences.
#[derive(Debug, Clone)]
pub struct SequenceForecaster {
    config: SequenceConfig,
    fitted: Option<FittedSequence>,
}

#[derive(Debug, Clone)]
struct FittedSequence {
    cell: LstmCell,
    head: Dense,
    normalizer: MinMaxNormalizer,
    /// The last `lookback` normalized differences of the training window;
    /// the explicit buffer the recursive forecast slides forward
    buffer: Vec<f64>,
    last_close: f64,
    last_date: chrono::NaiveDate,
}

impl SequenceForecaster {
    /// Create a forecaster with the given parameters.
    pub fn new(config: SequenceConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl Default for SequenceForecaster {
    fn default() -> Self {
        Self::new(SequenceConfig::default())
    }
}

impl Forecaster for SequenceForecaster {
    fn kind(&self) -> ModelKind {
        ModelKind::Sequence
    }

    fn fit(&mut self, window: &TrainingWindow<'_>, deadline: Option<Deadline>) -> Result<()> {
        check_deadline(deadline)?;

        let cfg = &self.config;
        let n = window.len();
        let required = cfg.lookback + cfg.min_training_sequences;
        if n < required {
            return Err(ForecastError::ModelFit(format!(
                "training window too short for sequence model: {n} points, {required} required"
            )));
        }

        let closes = window.closes();

        // The model learns daily changes, not price levels; the change
        // series is closer to stationary and the recursive forecast
        // reconstructs prices by cumulative sum.
        let diffs: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

        // Scaling statistics come from the training window only.
        let normalizer = MinMaxNormalizer::fit(&diffs)?;
        let normalized = normalizer.transform(&diffs);

        let sequences = build_sequences(&normalized, cfg.lookback);
        if sequences.is_empty() {
            return Err(ForecastError::ModelFit(
                "no training sequences could be built".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let cell = LstmCell::new(1, cfg.hidden_size, &mut rng);
        let mut head = Dense::new(cfg.hidden_size, 1, Activation::Linear, &mut rng);

        // The encoder is fixed, so every window encodes once up front.
        let mut features: Vec<Array1<f64>> = Vec::with_capacity(sequences.len());
        for (i, input) in sequences.inputs.iter().enumerate() {
            if i % 64 == 0 {
                check_deadline(deadline)?;
            }
            features.push(cell.encode(input));
        }

        // SGD on the linear readout: for squared error the gradient is
        // (prediction - target) * hidden state.
        for epoch in 0..cfg.epochs {
            check_deadline(deadline)?;
            let mut epoch_loss = 0.0;
            for (h, &target) in features.iter().zip(sequences.targets.iter()) {
                let prediction = head.forward(h)[0];
                let error = prediction - target;
                epoch_loss += error * error;

                let step = cfg.learning_rate * error;
                for (w, &hi) in head.weights.row_mut(0).iter_mut().zip(h.iter()) {
                    *w -= step * hi;
                }
                head.biases[0] -= step;
            }
            debug!(
                epoch,
                loss = epoch_loss / sequences.len() as f64,
                "sequence readout epoch"
            );
        }

        let buffer = normalized[normalized.len() - cfg.lookback..].to_vec();
        let last_point = &window.points()[n - 1];
        self.fitted = Some(FittedSequence {
            cell,
            head,
            normalizer,
            buffer,
            last_close: last_point.close,
            last_date: last_point.date,
        });
        Ok(())
    }

    /// Recursive multi-step forecast. Each predicted normalized change
    /// is pushed into the sliding buffer and fed back as input for the
    /// next step; prediction errors therefore compound over the horizon.
    fn predict(&self, horizon: usize) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or_else(|| {
            ForecastError::ModelFit("model not fitted; call fit() first".to_string())
        })?;

        let mut buffer = fitted.buffer.clone();
        let mut price = fitted.last_close;
        let dates = future_dates(fitted.last_date, horizon);
        let mut points = Vec::with_capacity(horizon);

        for date in dates {
            let hidden = fitted.cell.encode(&buffer);
            let predicted = fitted.head.forward(&hidden)[0];

            buffer.remove(0);
            buffer.push(predicted);

            let change = fitted.normalizer.inverse_one(predicted);
            price = (price + change).max(0.0);

            points.push(ForecastPoint {
                date,
                point_estimate: price,
                lower_bound: None,
                upper_bound: None,
            });
        }

        Ok(Forecast {
            model_kind: ModelKind::Sequence,
            points,
        })
    }
}
