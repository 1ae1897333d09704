//! Wires the pipeline stages together for a single input document.

use std::path::Path;

use anyhow::{Context, Result};
use kw_config::RunConfig;
use kw_core::{Chunk, StructuredSentence};
use kw_detect::detect_boundaries;
use kw_embed::Embedder;
use kw_llm::ProviderRouter;

/// Run pre-processing, embedding, and the four-stage boundary cascade,
/// returning the structured sentences alongside one boundary flag per
/// sentence (`true` iff a chunk boundary falls immediately after it).
pub async fn detect(
    input: &Path,
    config: &RunConfig,
    router: &ProviderRouter,
) -> Result<(Vec<StructuredSentence>, Vec<bool>)> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input file '{}'", input.display()))?;

    let sentences = kw_core::preprocess(&content, &config.document_structure);
    if sentences.is_empty() {
        return Ok((sentences, Vec::new()));
    }

    let embedder =
        Embedder::new(config.embed.clone()).context("failed to initialize embedding model")?;
    let texts: Vec<String> = sentences.iter().map(|s| s.text.clone()).collect();
    let embeddings = embedder
        .encode(texts)
        .await
        .context("failed to embed sentences")?;

    let boundaries = detect_boundaries(
        &sentences,
        &embeddings,
        router,
        &config.detect,
        config.llm.n_vote,
        None,
    )
    .await
    .context("boundary detection failed")?;

    Ok((sentences, boundaries))
}

/// Run the full pipeline, producing finished chunks ready for persistence.
pub async fn run(input: &Path, config: &RunConfig, router: &ProviderRouter) -> Result<Vec<Chunk>> {
    let (sentences, boundaries) = detect(input, config, router).await?;
    let chunks = kw_core::build_chunks(&sentences, &boundaries, &config.builder)
        .context("chunk assembly failed")?;
    Ok(chunks)
}
