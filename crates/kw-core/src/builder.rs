//! Chunk builder (spec §4.5, component C7).
//!
//! Consumes the ordered sentence stream plus the boundary decision for each
//! sentence (`true` = a boundary immediately follows this sentence) and
//! groups runs of sentences into [`Chunk`]s, enforcing `min_chars`/
//! `max_chars` (and, when configured, `min_tokens`/`max_tokens`) bounds.
//!
//! A run that would exceed `max_chars` is hard-split at the nearest prior
//! sentence boundary rather than emitted oversized; a run that would fall
//! below `min_chars` is merged into the following run unless it is the last
//! run in the document, mirroring the "never drop content" invariant
//! shared with `zen-parser`'s `split_to_max_size`.

use crate::config::BuilderConfig;
use crate::error::CoreError;
use crate::model::{Chunk, StructuredSentence};

/// Approximate token count, used only for the advisory `min_tokens`/
/// `max_tokens` guards (spec §9: characters are canonical).
fn approx_token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Build chunks from `sentences`, where `boundaries[i]` is `true` iff a
/// chunk boundary falls immediately after `sentences[i]`. `boundaries` must
/// be the same length as `sentences`; the last element is treated as `true`
/// regardless of its value, since the document's final sentence always
/// closes the final chunk.
///
/// # Errors
///
/// Returns [`CoreError::InvalidBound`] if `config.min_chars > config.max_chars`.
pub fn build_chunks(
    sentences: &[StructuredSentence],
    boundaries: &[bool],
    config: &BuilderConfig,
) -> Result<Vec<Chunk>, CoreError> {
    config.validate().map_err(CoreError::InvalidBound)?;

    if sentences.is_empty() {
        return Ok(Vec::new());
    }
    assert_eq!(
        sentences.len(),
        boundaries.len(),
        "boundaries must align 1:1 with sentences"
    );

    let runs = split_into_runs(sentences, boundaries, config);
    let merged = enforce_min_chars(runs, sentences, config);

    Ok(merged
        .into_iter()
        .map(|run| materialize_chunk(&sentences[run]))
        .collect())
}

/// First pass: split at every boundary, additionally forcing a split
/// whenever appending the next sentence would exceed `max_chars`, or (when
/// configured) `max_tokens`.
fn split_into_runs(
    sentences: &[StructuredSentence],
    boundaries: &[bool],
    config: &BuilderConfig,
) -> Vec<std::ops::Range<usize>> {
    let mut runs = Vec::new();
    let mut run_start = 0usize;
    let mut run_chars = 0usize;
    let mut run_tokens = 0usize;

    for (i, sentence) in sentences.iter().enumerate() {
        let added_chars = sentence.text.chars().count() + 1; // +1 for the joining space
        let added_tokens = approx_token_count(&sentence.text);
        let exceeds_chars = run_chars > 0 && run_chars + added_chars > config.max_chars;
        let exceeds_tokens = run_tokens > 0
            && config
                .max_tokens
                .is_some_and(|max| run_tokens + added_tokens > max);
        if exceeds_chars || exceeds_tokens {
            runs.push(run_start..i);
            run_start = i;
            run_chars = 0;
            run_tokens = 0;
        }
        run_chars += added_chars;
        run_tokens += added_tokens;

        let is_last = i == sentences.len() - 1;
        if is_last || boundaries[i] {
            runs.push(run_start..i + 1);
            run_start = i + 1;
            run_chars = 0;
            run_tokens = 0;
        }
    }

    runs
}

/// Char and approximate token totals for the sentences spanned by `range`,
/// using the same per-sentence measure [`split_into_runs`] accumulates.
fn run_measure(sentences: &[StructuredSentence], range: &std::ops::Range<usize>) -> (usize, usize) {
    sentences[range.clone()].iter().fold((0, 0), |(chars, tokens), sentence| {
        (
            chars + sentence.text.chars().count() + 1,
            tokens + approx_token_count(&sentence.text),
        )
    })
}

/// A run is under-sized if it falls below `min_chars`, or, when
/// `min_tokens` is configured, below that too — the token bound is an
/// additional guard, never a substitute for the character one (spec §9).
fn is_undersized(sentences: &[StructuredSentence], range: &std::ops::Range<usize>, config: &BuilderConfig) -> bool {
    let (chars, tokens) = run_measure(sentences, range);
    chars < config.min_chars || config.min_tokens.is_some_and(|min| tokens < min)
}

/// Second pass: a run under `min_chars` (or, when configured, under
/// `min_tokens`) is folded into its successor (or, if it is the last run,
/// into its predecessor) so no chunk is dropped and the minimum bound is
/// respected wherever the document has enough material to satisfy it.
fn enforce_min_chars(
    runs: Vec<std::ops::Range<usize>>,
    sentences: &[StructuredSentence],
    config: &BuilderConfig,
) -> Vec<std::ops::Range<usize>> {
    if runs.len() <= 1 {
        return runs;
    }

    let mut merged: Vec<std::ops::Range<usize>> = Vec::with_capacity(runs.len());
    for run in runs {
        if let Some(prev) = merged.last_mut()
            && is_undersized(sentences, prev, config)
        {
            prev.end = run.end;
            continue;
        }
        merged.push(run);
    }

    // The final run may still be short; fold it backwards if possible.
    if merged.len() > 1 {
        let last = merged.len() - 1;
        if is_undersized(sentences, &merged[last], config) {
            let tail = merged.remove(last);
            merged.last_mut().expect("len > 1 after removal").end = tail.end;
        }
    }

    merged
}

fn materialize_chunk(slice: &[StructuredSentence]) -> Chunk {
    let text = crate::reconstruct::reconstruct_text(slice);
    let metadata = Chunk::metadata_from(slice);
    Chunk {
        sentences: slice.to_vec(),
        char_count: text.chars().count(),
        token_count: approx_token_count(&text),
        text,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StructureType;
    use pretty_assertions::assert_eq;

    fn sentence(text: &str, line: u32, kind: StructureType) -> StructuredSentence {
        StructuredSentence {
            text: text.to_string(),
            line_number: line,
            structure_type: kind,
            indent_level: 0,
            structure_info: String::new(),
        }
    }

    #[test]
    fn single_run_with_no_boundaries() {
        let sentences = vec![
            sentence("One.", 1, StructureType::Plain),
            sentence("Two.", 2, StructureType::Plain),
        ];
        let boundaries = vec![false, false];
        let chunks = build_chunks(&sentences, &boundaries, &BuilderConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sentences.len(), 2);
    }

    #[test]
    fn boundary_splits_two_chunks_when_both_meet_min_chars() {
        let long_a = "A".repeat(250);
        let long_b = "B".repeat(250);
        let sentences = vec![
            sentence(&long_a, 1, StructureType::Plain),
            sentence(&long_b, 2, StructureType::Plain),
        ];
        let boundaries = vec![true, false];
        let chunks = build_chunks(&sentences, &boundaries, &BuilderConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn short_run_merges_forward() {
        let sentences = vec![
            sentence("Short.", 1, StructureType::Plain),
            sentence(&"X".repeat(250), 2, StructureType::Plain),
        ];
        let boundaries = vec![true, false];
        let chunks = build_chunks(&sentences, &boundaries, &BuilderConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sentences.len(), 2);
    }

    #[test]
    fn oversized_run_is_hard_split() {
        let sentences: Vec<_> = (0..20)
            .map(|i| sentence(&"Z".repeat(100), i + 1, StructureType::Plain))
            .collect();
        let boundaries = vec![false; 20];
        let config = BuilderConfig {
            min_chars: 10,
            max_chars: 500,
            min_tokens: None,
            max_tokens: None,
        };
        let chunks = build_chunks(&sentences, &boundaries, &config).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_count <= config.max_chars + 100);
        }
    }

    #[test]
    fn invalid_bounds_rejected() {
        let sentences = vec![sentence("One.", 1, StructureType::Plain)];
        let boundaries = vec![true];
        let config = BuilderConfig {
            min_chars: 500,
            max_chars: 100,
            min_tokens: None,
            max_tokens: None,
        };
        assert!(build_chunks(&sentences, &boundaries, &config).is_err());
    }

    #[test]
    fn max_tokens_forces_split_even_under_max_chars() {
        let sentences: Vec<_> = (0..4)
            .map(|i| sentence("w w w", i + 1, StructureType::Plain))
            .collect();
        let boundaries = vec![false; 4];
        let config = BuilderConfig {
            min_chars: 0,
            max_chars: 10_000,
            min_tokens: None,
            max_tokens: Some(5),
        };
        let chunks = build_chunks(&sentences, &boundaries, &config).unwrap();
        // Each sentence is 3 tokens; any two together exceed max_tokens(5),
        // so every sentence must seal its own chunk despite ample char room.
        assert_eq!(chunks.len(), 4);
    }

    #[test]
    fn min_tokens_forces_merge_even_over_min_chars() {
        let sentences = vec![
            sentence("w w w", 1, StructureType::Plain),
            sentence("w w w", 2, StructureType::Plain),
        ];
        let boundaries = vec![true, false];
        let config = BuilderConfig {
            min_chars: 0,
            max_chars: 10_000,
            min_tokens: Some(5),
            max_tokens: None,
        };
        let chunks = build_chunks(&sentences, &boundaries, &config).unwrap();
        // Each run is only 3 tokens, under min_tokens(5), so the first run
        // merges forward despite already clearing the (disabled) char floor.
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sentences.len(), 2);
    }

    #[test]
    fn no_sentences_dropped_across_merges() {
        let sentences = vec![
            sentence("A.", 1, StructureType::Plain),
            sentence("B.", 2, StructureType::Plain),
            sentence("C.", 3, StructureType::Plain),
        ];
        let boundaries = vec![true, true, false];
        let chunks = build_chunks(&sentences, &boundaries, &BuilderConfig::default()).unwrap();
        let total: usize = chunks.iter().map(|c| c.sentences.len()).sum();
        assert_eq!(total, sentences.len());
    }
}
