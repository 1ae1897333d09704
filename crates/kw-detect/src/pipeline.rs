//! Orchestrates the four detector stages in sequence (spec §4.3-§4.5).

use kw_core::StructuredSentence;
use kw_llm::ProviderRouter;

use crate::config::DetectorConfig;
use crate::decision::finalize;
use crate::error::DetectError;
use crate::ner::NerTagger;
use crate::{stage_a, stage_b, stage_c, stage_d};

/// Run the full cascade, returning one boolean per sentence: `true` iff a
/// chunk boundary falls immediately after that sentence. The final
/// sentence's entry is always `true`.
///
/// # Errors
///
/// Returns [`DetectError::CountMismatch`] if `embeddings.len() !=
/// sentences.len()`, or [`DetectError::InvalidConfig`] if
/// `theta_low >= theta_high`.
pub async fn detect_boundaries(
    sentences: &[StructuredSentence],
    embeddings: &[Vec<f32>],
    router: &ProviderRouter,
    config: &DetectorConfig,
    n_vote: u32,
    ner_tagger: Option<&dyn NerTagger>,
) -> Result<Vec<bool>, DetectError> {
    config.validate().map_err(DetectError::InvalidConfig)?;

    if embeddings.len() != sentences.len() {
        return Err(DetectError::CountMismatch {
            expected: sentences.len(),
            got: embeddings.len(),
        });
    }

    if sentences.len() < 2 {
        return Ok(vec![true; sentences.len()]);
    }

    let similarities = stage_a::gap_similarities(embeddings);
    let after_a = stage_a::screen(&similarities, config);
    let after_b = stage_b::refine(&similarities, &after_a, config);

    let sentence_texts: Vec<String> = sentences.iter().map(|s| s.text.clone()).collect();
    let after_c = stage_c::adjudicate(
        router,
        &sentence_texts,
        &similarities,
        &after_b,
        n_vote,
        config.theta_low,
        config.theta_high,
    )
    .await;

    let boundaries = finalize(&after_c, sentences.len());
    Ok(stage_d::apply(sentences, boundaries, config, ner_tagger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kw_core::StructureType;
    use kw_llm::{FailoverConfig, LlmConfig};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn single_sentence_document_has_one_boundary() {
        let sentences = vec![StructuredSentence {
            text: "Only.".into(),
            line_number: 1,
            structure_type: StructureType::Plain,
            indent_level: 0,
            structure_info: String::new(),
        }];
        let embeddings = vec![vec![1.0, 0.0]];
        let router = ProviderRouter::new(&LlmConfig::default(), FailoverConfig::default(), None);
        let result = detect_boundaries(
            &sentences,
            &embeddings,
            &router,
            &DetectorConfig::default(),
            3,
            None,
        )
        .await
        .unwrap();
        assert_eq!(result, vec![true]);
    }

    #[tokio::test]
    async fn count_mismatch_is_rejected() {
        let sentences = vec![
            StructuredSentence {
                text: "A.".into(),
                line_number: 1,
                structure_type: StructureType::Plain,
                indent_level: 0,
                structure_info: String::new(),
            },
            StructuredSentence {
                text: "B.".into(),
                line_number: 2,
                structure_type: StructureType::Plain,
                indent_level: 0,
                structure_info: String::new(),
            },
        ];
        let embeddings = vec![vec![1.0, 0.0]];
        let router = ProviderRouter::new(&LlmConfig::default(), FailoverConfig::default(), None);
        let result = detect_boundaries(
            &sentences,
            &embeddings,
            &router,
            &DetectorConfig::default(),
            3,
            None,
        )
        .await;
        assert!(result.is_err());
    }
}
