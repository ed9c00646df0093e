//! # Preprocessing module
//!
//! Data preparation for the sequence forecaster:
//! - min-max normalization with train-only statistics
//! - sliding-window sequence construction

mod normalizer;
mod windows;

pub use normalizer::MinMaxNormalizer;
pub use windows::{build_sequences, SequenceSet};
