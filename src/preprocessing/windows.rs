//! Sliding-window sequence construction for the sequence forecaster.

/// Fixed-length input sequences, each paired with the next value as the
/// training target.
#[derive(Debug, Clone)]
pub struct SequenceSet {
    /// Input windows, each of length `lookback`
    pub inputs: Vec<Vec<f64>>,
    /// The value immediately following each window
    pub targets: Vec<f64>,
}

impl SequenceSet {
    /// Number of training sequences.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True when no sequences could be built.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Slide a `lookback`-sized window over `data`, pairing each window with
/// the next observation. Returns an empty set when `data` is too short.
pub fn build_sequences(data: &[f64], lookback: usize) -> SequenceSet {
    if lookback == 0 || data.len() <= lookback {
        return SequenceSet {
            inputs: Vec::new(),
            targets: Vec::new(),
        };
    }

    let count = data.len() - lookback;
    let mut inputs = Vec::with_capacity(count);
    let mut targets = Vec::with_capacity(count);

    for i in 0..count {
        inputs.push(data[i..i + lookback].to_vec());
        targets.push(data[i + lookback]);
    }

    SequenceSet { inputs, targets }
}
