//! Embedder configuration (spec §4.2).

use serde::{Deserialize, Serialize};

fn default_model_name() -> String {
    String::from("AllMiniLML6V2")
}

const fn default_batch_size() -> usize {
    64
}

const fn default_scratch_release_every() -> usize {
    16
}

/// Local embedding model settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbedConfig {
    /// `fastembed::EmbeddingModel` variant name, e.g. `"AllMiniLML6V2"`.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Sentences per `TextEmbedding::embed` call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Re-create the model's scratch buffers every N batches to bound
    /// memory growth across a long document stream.
    #[serde(default = "default_scratch_release_every")]
    pub scratch_release_every: usize,

    /// Override for the model cache directory. Defaults to
    /// `~/.cache/kiriwake/fastembed` when unset.
    #[serde(default)]
    pub cache_dir: Option<String>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            batch_size: default_batch_size(),
            scratch_release_every: default_scratch_release_every(),
            cache_dir: None,
        }
    }
}
