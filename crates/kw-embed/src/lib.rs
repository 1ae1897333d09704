//! Local embedding generation using fastembed (ONNX runtime).
//!
//! Generates L2-normalized 384-dimensional vectors for structured
//! sentences, without requiring any external API keys.

pub mod config;
pub mod embedder;
pub mod error;

pub use config::EmbedConfig;
pub use embedder::Embedder;
pub use error::EmbeddingError;
