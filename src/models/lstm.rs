//! LSTM cell used by the sequence forecaster.
//!
//! A single recurrent cell with the four standard gates. The sequence
//! forecaster runs it as an encoder over a lookback window and reads the
//! final hidden state.

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

/// One LSTM layer.
#[derive(Debug, Clone)]
pub struct LstmCell {
    /// Number of input features per time step
    pub input_size: usize,
    /// Hidden-state width
    pub hidden_size: usize,

    // input gate
    w_ii: Array2<f64>,
    w_hi: Array2<f64>,
    b_i: Array1<f64>,

    // forget gate
    w_if: Array2<f64>,
    w_hf: Array2<f64>,
    b_f: Array1<f64>,

    // cell candidate
    w_ig: Array2<f64>,
    w_hg: Array2<f64>,
    b_g: Array1<f64>,

    // output gate
    w_io: Array2<f64>,
    w_ho: Array2<f64>,
    b_o: Array1<f64>,
}

impl LstmCell {
    /// Create a cell with uniform init scaled by the hidden size. The
    /// forget-gate bias starts at 1 so early training does not erase the
    /// cell state.
    pub fn new(input_size: usize, hidden_size: usize, rng: &mut StdRng) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();

        let w_ii = random_matrix(hidden_size, input_size, limit, rng);
        let w_hi = random_matrix(hidden_size, hidden_size, limit, rng);
        let w_if = random_matrix(hidden_size, input_size, limit, rng);
        let w_hf = random_matrix(hidden_size, hidden_size, limit, rng);
        let w_ig = random_matrix(hidden_size, input_size, limit, rng);
        let w_hg = random_matrix(hidden_size, hidden_size, limit, rng);
        let w_io = random_matrix(hidden_size, input_size, limit, rng);
        let w_ho = random_matrix(hidden_size, hidden_size, limit, rng);

        Self {
            input_size,
            hidden_size,
            w_ii,
            w_hi,
            b_i: Array1::zeros(hidden_size),
            w_if,
            w_hf,
            b_f: Array1::from_elem(hidden_size, 1.0),
            w_ig,
            w_hg,
            b_g: Array1::zeros(hidden_size),
            w_io,
            w_ho,
            b_o: Array1::zeros(hidden_size),
        }
    }

    /// One time step.
    ///
    /// Gates:
    /// i = sigma(W_ii x + W_hi h + b_i), f = sigma(W_if x + W_hf h + b_f),
    /// g = tanh(W_ig x + W_hg h + b_g), o = sigma(W_io x + W_ho h + b_o),
    /// c' = f * c + i * g, h' = o * tanh(c').
    pub fn forward(
        &self,
        x: &Array1<f64>,
        h_prev: &Array1<f64>,
        c_prev: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let i_gate = sigmoid(&(self.w_ii.dot(x) + self.w_hi.dot(h_prev) + &self.b_i));
        let f_gate = sigmoid(&(self.w_if.dot(x) + self.w_hf.dot(h_prev) + &self.b_f));
        let g = tanh(&(self.w_ig.dot(x) + self.w_hg.dot(h_prev) + &self.b_g));
        let o_gate = sigmoid(&(self.w_io.dot(x) + self.w_ho.dot(h_prev) + &self.b_o));

        let c_next = &f_gate * c_prev + &i_gate * &g;
        let h_next = &o_gate * &tanh(&c_next);

        (h_next, c_next)
    }

    /// Zeroed hidden and cell state.
    pub fn init_hidden(&self) -> (Array1<f64>, Array1<f64>) {
        (
            Array1::zeros(self.hidden_size),
            Array1::zeros(self.hidden_size),
        )
    }

    /// Run a single-feature sequence through the cell and return the
    /// final hidden state.
    pub fn encode(&self, sequence: &[f64]) -> Array1<f64> {
        let (mut h, mut c) = self.init_hidden();
        let mut x = Array1::zeros(self.input_size);
        for &value in sequence {
            x[0] = value;
            let (h_next, c_next) = self.forward(&x, &h, &c);
            h = h_next;
            c = c_next;
        }
        h
    }
}

fn random_matrix(rows: usize, cols: usize, limit: f64, rng: &mut StdRng) -> Array2<f64> {
    Array2::random_using((rows, cols), Uniform::new(-limit, limit), rng)
}

fn sigmoid(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

fn tanh(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.tanh())
}
