//! Detector error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    /// `embeddings.len()` did not match `sentences.len()`.
    #[error("embedding count {got} does not match sentence count {expected}")]
    CountMismatch { expected: usize, got: usize },

    /// A detector configuration bound is internally inconsistent.
    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),
}
