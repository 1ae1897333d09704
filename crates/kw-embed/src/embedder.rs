//! Local embedding generation (spec §4.2, component C2).
//!
//! Wraps `fastembed::TextEmbedding`, which is synchronous and owns its own
//! thread pool internally — callers in the async pipeline should go through
//! [`Embedder::encode`], which offloads to `tokio::task::spawn_blocking`,
//! the same strategy the embeddings spike documents for fastembed calls
//! made from a tokio runtime.
//!
//! Every `scratch_release_every` batches, the model is dropped and
//! re-initialized to bound the ONNX runtime's scratch-buffer growth across
//! a long document stream. A batch that fails embedding is retried once at
//! half its size (recursively), down to single sentences; a single
//! sentence that fails twice surfaces a fatal [`EmbeddingError`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::config::EmbedConfig;
use crate::error::EmbeddingError;

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kiriwake")
        .join("fastembed")
}

/// Map a configured model name onto a `fastembed` model variant. Kept as an
/// explicit match (rather than relying on a `FromStr` impl from the crate)
/// so unsupported names fail with a message naming the field, not a raw
/// parse error.
fn resolve_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
    match name {
        "AllMiniLML6V2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "AllMiniLML6V2Q" => Ok(EmbeddingModel::AllMiniLML6V2Q),
        "BGESmallENV15" => Ok(EmbeddingModel::BGESmallENV15),
        "BGEBaseENV15" => Ok(EmbeddingModel::BGEBaseENV15),
        other => Err(EmbeddingError::InitFailed(format!(
            "unknown embedding model '{other}'"
        ))),
    }
}

fn init_options(config: &EmbedConfig) -> Result<TextInitOptions, EmbeddingError> {
    let model = resolve_model(&config.model_name)?;
    let cache_dir = config
        .cache_dir
        .as_ref()
        .map_or_else(default_cache_dir, PathBuf::from);
    Ok(TextInitOptions::new(model)
        .with_cache_dir(cache_dir)
        .with_show_download_progress(false))
}

struct Inner {
    model: TextEmbedding,
    batches_since_release: usize,
}

/// Thread-safe handle to a local embedding model.
pub struct Embedder {
    inner: Arc<Mutex<Inner>>,
    config: EmbedConfig,
}

impl Embedder {
    /// Load the configured model.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if the model name is
    /// unrecognized or the ONNX runtime fails to initialize (download
    /// failure, corrupt cache, etc.).
    pub fn new(config: EmbedConfig) -> Result<Self, EmbeddingError> {
        let model = TextEmbedding::try_new(init_options(&config)?)
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                model,
                batches_since_release: 0,
            })),
            config,
        })
    }

    /// Encode `texts` in order, in `batch_size`-sized chunks, returning
    /// L2-normalized vectors in the same order as the input. Runs on a
    /// blocking thread since fastembed's inference is synchronous.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if a single sentence fails
    /// embedding twice, or [`EmbeddingError::CountMismatch`] if the model
    /// returns an unexpected vector count for a batch.
    pub async fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let inner = Arc::clone(&self.inner);
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || encode_blocking(&inner, &config, &texts))
            .await
            .map_err(|e| EmbeddingError::EmbedFailed(format!("embedding task panicked: {e}")))?
    }
}

fn encode_blocking(
    inner: &Arc<Mutex<Inner>>,
    config: &EmbedConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut out = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(config.batch_size.max(1)) {
        let vectors = embed_batch_with_retry(inner, config, chunk)?;
        out.extend(vectors);
        maybe_release_scratch(inner, config)?;
    }
    Ok(out)
}

fn embed_batch_with_retry(
    inner: &Arc<Mutex<Inner>>,
    config: &EmbedConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    match embed_once(inner, texts) {
        Ok(vectors) => Ok(normalize_all(vectors)),
        Err(first_error) => {
            if texts.len() > 1 {
                let mid = texts.len() / 2;
                let mut left = embed_batch_with_retry(inner, config, &texts[..mid])?;
                let right = embed_batch_with_retry(inner, config, &texts[mid..])?;
                left.extend(right);
                Ok(left)
            } else {
                match embed_once(inner, texts) {
                    Ok(vectors) => Ok(normalize_all(vectors)),
                    Err(_) => Err(EmbeddingError::EmbedFailed(first_error)),
                }
            }
        }
    }
}

fn embed_once(inner: &Arc<Mutex<Inner>>, texts: &[String]) -> Result<Vec<Vec<f32>>, String> {
    let mut guard = inner.lock().expect("embedder mutex poisoned");
    let vectors = guard
        .model
        .embed(texts.to_vec(), None)
        .map_err(|e| e.to_string())?;
    if vectors.len() != texts.len() {
        return Err(format!(
            "model returned {} vectors for {} inputs",
            vectors.len(),
            texts.len()
        ));
    }
    Ok(vectors)
}

fn maybe_release_scratch(
    inner: &Arc<Mutex<Inner>>,
    config: &EmbedConfig,
) -> Result<(), EmbeddingError> {
    if config.scratch_release_every == 0 {
        return Ok(());
    }
    let mut guard = inner.lock().expect("embedder mutex poisoned");
    guard.batches_since_release += 1;
    if guard.batches_since_release >= config.scratch_release_every {
        let fresh = TextEmbedding::try_new(init_options(config)?)
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        guard.model = fresh;
        guard.batches_since_release = 0;
    }
    Ok(())
}

fn normalize_all(vectors: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    vectors.into_iter().map(|v| l2_normalize(&v)).collect()
}

/// L2-normalize a vector in place, returning it unchanged if it is already
/// (approximately) zero-length.
fn l2_normalize(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return vector.to_vec();
    }
    vector.iter().map(|x| x / norm).collect()
}
