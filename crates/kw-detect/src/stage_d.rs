//! Stage D: structural post-filter (spec §4.5).
//!
//! Applies, in order:
//! 1. Forced boundaries: immediately before a header, immediately after a
//!    list region ends, or across a large indent-level jump.
//! 2. Anti-fragmentation: two consecutive list items of the same marker
//!    type at the same indent level never split, overriding whatever the
//!    earlier stages decided — unless a forced-true rule above already
//!    applies to that gap.
//! 3. NER-Jaccard demotion (pluggable; a no-op when no tagger is wired
//!    in): high entity overlap between the two sentences demotes a
//!    boundary back to false.
//! 4. Short-connective demotion: a short sentence opening with a
//!    continuation cue (spec's configured connective list) demotes a
//!    boundary back to false.

use kw_core::{StructureType, StructuredSentence};

use crate::config::DetectorConfig;
use crate::ner::{jaccard, NerTagger};

/// Apply all structural overrides to a boundary vector already finalized
/// by Stages A-C. `boundaries[i]` means a boundary after `sentences[i]`;
/// the final sentence's entry is left untouched since spec requires a
/// document's last sentence to always close the last chunk.
#[must_use]
pub fn apply(
    sentences: &[StructuredSentence],
    mut boundaries: Vec<bool>,
    config: &DetectorConfig,
    ner_tagger: Option<&dyn NerTagger>,
) -> Vec<bool> {
    if sentences.len() < 2 {
        return boundaries;
    }

    let mut forced_true = vec![false; boundaries.len()];

    for i in 0..sentences.len() - 1 {
        let current = &sentences[i];
        let next = &sentences[i + 1];

        if next.structure_type == StructureType::Header {
            boundaries[i] = true;
            forced_true[i] = true;
        }
        if current.structure_type == StructureType::List && next.structure_type != StructureType::List {
            boundaries[i] = true;
            forced_true[i] = true;
        }
        let indent_delta = current.indent_level.abs_diff(next.indent_level);
        if indent_delta >= config.large_indent_delta {
            boundaries[i] = true;
            forced_true[i] = true;
        }
    }

    for i in 0..sentences.len() - 1 {
        if forced_true[i] {
            continue;
        }
        let current = &sentences[i];
        let next = &sentences[i + 1];

        if is_same_list_run(current, next) {
            boundaries[i] = false;
            continue;
        }

        if config.ner_demotion_enabled
            && let Some(tagger) = ner_tagger
        {
            let entities_current = tagger.entities(&current.text);
            let entities_next = tagger.entities(&next.text);
            if jaccard(&entities_current, &entities_next) >= config.ner_jaccard_threshold {
                boundaries[i] = false;
                continue;
            }
        }

        if is_short_connective_continuation(next, config) {
            boundaries[i] = false;
        }
    }

    boundaries
}

fn is_same_list_run(current: &StructuredSentence, next: &StructuredSentence) -> bool {
    current.structure_type == StructureType::List
        && next.structure_type == StructureType::List
        && current.indent_level == next.indent_level
        && current.is_ordered_list() == next.is_ordered_list()
}

fn is_short_connective_continuation(next: &StructuredSentence, config: &DetectorConfig) -> bool {
    if next.text.chars().count() > config.short_connective_max_chars {
        return false;
    }
    config
        .connectives
        .iter()
        .any(|c| next.text.starts_with(c.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sentence(text: &str, kind: StructureType, indent: u32, info: &str) -> StructuredSentence {
        StructuredSentence {
            text: text.to_string(),
            line_number: 1,
            structure_type: kind,
            indent_level: indent,
            structure_info: info.to_string(),
        }
    }

    #[test]
    fn forces_boundary_before_header() {
        let sentences = vec![
            sentence("Body.", StructureType::Plain, 0, ""),
            sentence("Title", StructureType::Header, 0, "header:1"),
        ];
        let boundaries = apply(&sentences, vec![false, true], &DetectorConfig::default(), None);
        assert!(boundaries[0]);
    }

    #[test]
    fn forces_boundary_after_list_ends() {
        let sentences = vec![
            sentence("item", StructureType::List, 0, "list:unordered"),
            sentence("Next para.", StructureType::Plain, 0, ""),
        ];
        let boundaries = apply(&sentences, vec![false, true], &DetectorConfig::default(), None);
        assert!(boundaries[0]);
    }

    #[test]
    fn anti_fragmentation_merges_same_type_list_items() {
        let sentences = vec![
            sentence("item one", StructureType::List, 0, "list:unordered"),
            sentence("item two", StructureType::List, 0, "list:unordered"),
        ];
        let boundaries = apply(&sentences, vec![true, true], &DetectorConfig::default(), None);
        assert!(!boundaries[0]);
    }

    #[test]
    fn large_indent_delta_forces_boundary() {
        let config = DetectorConfig {
            large_indent_delta: 1,
            ..DetectorConfig::default()
        };
        let sentences = vec![
            sentence("Outer.", StructureType::Plain, 0, ""),
            sentence("Inner.", StructureType::Plain, 2, ""),
        ];
        let boundaries = apply(&sentences, vec![false, true], &config, None);
        assert!(boundaries[0]);
    }

    #[test]
    fn short_connective_demotes_boundary() {
        let config = DetectorConfig::default();
        let sentences = vec![
            sentence("First thought.", StructureType::Plain, 0, ""),
            sentence("また、続く。", StructureType::Plain, 0, ""),
        ];
        let boundaries = apply(&sentences, vec![true, true], &config, None);
        assert!(!boundaries[0]);
    }

    struct AlwaysOverlapTagger;
    impl NerTagger for AlwaysOverlapTagger {
        fn entities(&self, _text: &str) -> std::collections::HashSet<String> {
            ["Tokyo".to_string()].into_iter().collect()
        }
    }

    #[test]
    fn ner_overlap_demotes_boundary() {
        let config = DetectorConfig::default();
        let sentences = vec![
            sentence("Tokyo is large.", StructureType::Plain, 0, ""),
            sentence("Tokyo has trains.", StructureType::Plain, 0, ""),
        ];
        let tagger = AlwaysOverlapTagger;
        let boundaries = apply(&sentences, vec![true, true], &config, Some(&tagger));
        assert!(!boundaries[0]);
    }

    #[test]
    fn single_sentence_is_untouched() {
        let sentences = vec![sentence("Only.", StructureType::Plain, 0, "")];
        let boundaries = apply(&sentences, vec![true], &DetectorConfig::default(), None);
        assert_eq!(boundaries, vec![true]);
    }
}
