//! Sliding-window training sample generation.
//!
//! Contexts are one-hot encoded to `(N, L, V)`; targets stay raw integer
//! codes, the asymmetry a classification loss expects.

use std::collections::BTreeSet;

use candle_core::{Device, Tensor};

use crate::error::PreprocessError;
use crate::vocab::Mapping;

/// Training arrays handed to the model layer.
#[derive(Debug)]
pub struct TrainingData {
    /// One-hot contexts, shape `(num_sequences, sequence_length, vocab)`, f32.
    pub inputs: Tensor,
    /// Next-symbol codes, shape `(num_sequences,)`, u32.
    pub targets: Tensor,
}

/// Translates the corpus to integer codes via the mapping.
pub fn to_codes(corpus: &str, mapping: &Mapping) -> Result<Vec<u32>, PreprocessError> {
    corpus.split_whitespace().map(|t| mapping.code(t)).collect()
}

/// Slides a window of `sequence_length` codes across the corpus with stride
/// one; each window is a context, the code after it the target.
pub fn generate(
    corpus: &str,
    mapping: &Mapping,
    sequence_length: usize,
) -> Result<TrainingData, PreprocessError> {
    let codes = to_codes(corpus, mapping)?;
    if codes.len() < sequence_length + 1 {
        return Err(PreprocessError::CorpusTooShort {
            tokens: codes.len(),
            sequence_length,
        });
    }
    let observed: BTreeSet<u32> = codes.iter().copied().collect();
    if observed.len() != mapping.len() {
        return Err(PreprocessError::VocabularyMismatch {
            observed: observed.len(),
            mapped: mapping.len(),
        });
    }

    let vocab = mapping.len();
    let num_sequences = codes.len() - sequence_length;
    let mut one_hot = vec![0f32; num_sequences * sequence_length * vocab];
    let mut targets = Vec::with_capacity(num_sequences);
    for i in 0..num_sequences {
        for (j, &code) in codes[i..i + sequence_length].iter().enumerate() {
            one_hot[(i * sequence_length + j) * vocab + code as usize] = 1.0;
        }
        targets.push(codes[i + sequence_length]);
    }

    let device = Device::Cpu;
    let inputs = Tensor::from_vec(one_hot, (num_sequences, sequence_length, vocab), &device)
        .map_err(|e| PreprocessError::tensor("building input tensor", e))?;
    let targets = Tensor::from_vec(targets, (num_sequences,), &device)
        .map_err(|e| PreprocessError::tensor("building target tensor", e))?;
    Ok(TrainingData { inputs, targets })
}
