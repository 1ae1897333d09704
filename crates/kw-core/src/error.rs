//! Pre-processor and builder error types.

use thiserror::Error;

/// Errors raised while turning raw text into structured sentences or chunks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The input could not be interpreted as text (e.g. binary content).
    #[error("input is not representable as text at line {line}")]
    Structural { line: u32 },

    /// A size bound in the builder configuration is internally inconsistent.
    #[error("invalid size bound: {0}")]
    InvalidBound(String),
}
