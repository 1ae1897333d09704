//! Document structure model, structure-aware pre-tokenizer, and chunk
//! builder shared across the pipeline.

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod preprocessor;
pub mod reconstruct;

pub use builder::build_chunks;
pub use config::{BuilderConfig, DocumentStructureConfig};
pub use error::CoreError;
pub use model::{Chunk, ChunkMetadata, StructureType, StructuredSentence};
pub use preprocessor::preprocess;
pub use reconstruct::reconstruct_text;
