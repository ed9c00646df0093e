//! Dense output layer used as the readout of the sequence model.

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

/// Activation function applied element-wise after the affine transform.
#[derive(Debug, Clone, Copy)]
pub enum Activation {
    Linear,
    Tanh,
    Sigmoid,
}

impl Activation {
    /// Apply the activation to a single value.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

/// A fully connected layer.
#[derive(Debug, Clone)]
pub struct Dense {
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
    pub activation: Activation,
}

impl Dense {
    /// Create a layer with uniform initialization scaled by the fan-in.
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut StdRng,
    ) -> Self {
        let limit = (1.0 / input_size as f64).sqrt();
        Self {
            weights: Array2::random_using(
                (output_size, input_size),
                Uniform::new(-limit, limit),
                rng,
            ),
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    /// Forward pass for a single input vector.
    pub fn forward(&self, input: &Array1<f64>) -> Array1<f64> {
        let out = self.weights.dot(input) + &self.biases;
        out.mapv(|v| self.activation.apply(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_dense_forward_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = Dense::new(4, 2, Activation::Linear, &mut rng);
        let input = Array1::from(vec![0.1, 0.2, 0.3, 0.4]);
        let output = layer.forward(&input);
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_zero_input_gives_bias() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = Dense::new(3, 1, Activation::Linear, &mut rng);
        let output = layer.forward(&Array1::zeros(3));
        assert_eq!(output[0], layer.biases[0]);
    }
}
