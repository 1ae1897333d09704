//! Four-stage topic-boundary detector: embedding screen, windowed
//! anomaly detection, LLM adjudication with majority vote, and a
//! structural post-filter.

pub mod config;
pub mod decision;
pub mod error;
pub mod ner;
pub mod pipeline;
pub mod stage_a;
pub mod stage_b;
pub mod stage_c;
pub mod stage_d;
pub mod stats;

pub use config::DetectorConfig;
pub use decision::GapDecision;
pub use error::DetectError;
pub use ner::NerTagger;
pub use pipeline::detect_boundaries;
