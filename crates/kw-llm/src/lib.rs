//! LLM provider router: dispatches boundary-adjudication prompts to a
//! local and/or remote OpenAI-compatible chat-completions backend.

pub mod client;
pub mod config;
pub mod error;
pub mod router;

pub use client::{GenerationParams, LlmClient, LocalClient, RemoteClient};
pub use config::{FailoverConfig, LlmConfig, ProviderMode};
pub use error::{LlmCallError, RouterError};
pub use router::ProviderRouter;
