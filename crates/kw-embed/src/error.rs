//! Embedding error types.

use thiserror::Error;

/// Errors that can occur during embedding generation.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model initialization failed (download, ONNX runtime, cache issues).
    #[error("model initialization failed: {0}")]
    InitFailed(String),

    /// Embedding generation failed twice in a row for the same batch, even
    /// after halving its size (spec §4.2 retry policy).
    #[error("embedding generation failed after retry: {0}")]
    EmbedFailed(String),

    /// The model returned a different number of vectors than inputs.
    #[error("embedding model returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
}
