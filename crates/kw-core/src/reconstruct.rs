//! Chunk text reconstruction (spec §4.6).
//!
//! Joins a chunk's sentences back into a single string for persistence and
//! for re-embedding during evaluation. Headers are re-prefixed with `#`
//! repeated to their level; list items are re-prefixed with their
//! indentation and a `- `/`N. ` marker, with ordering indexes restarting at
//! each new list group; consecutive plain sentences are space-joined unless
//! a `paragraph_break` hint calls for a blank line between them.

use crate::model::{StructuredSentence, StructureType};

/// Rebuild the human-readable text of a chunk from its ordered sentences.
#[must_use]
pub fn reconstruct_text(sentences: &[StructuredSentence]) -> String {
    let mut out = String::new();
    let mut prev_type: Option<StructureType> = None;
    let mut list_ordinal = 0u32;
    let mut list_indent: Option<u32> = None;

    for sentence in sentences {
        if !out.is_empty() {
            let separator = separator_before(sentence, prev_type);
            out.push_str(separator);
        }

        match sentence.structure_type {
            StructureType::Header => {
                let level = sentence.header_level().unwrap_or(1);
                out.push_str(&"#".repeat(level as usize));
                out.push(' ');
            }
            StructureType::List => {
                let new_group =
                    prev_type != Some(StructureType::List) || list_indent != Some(sentence.indent_level);
                list_ordinal = if new_group { 1 } else { list_ordinal + 1 };
                list_indent = Some(sentence.indent_level);
                out.push_str(&" ".repeat(sentence.indent_level as usize));
                if sentence.is_ordered_list() {
                    out.push_str(&list_ordinal.to_string());
                    out.push_str(". ");
                } else {
                    out.push_str("- ");
                }
            }
            _ => {
                list_indent = None;
            }
        }

        out.push_str(&sentence.text);
        prev_type = Some(sentence.structure_type);
    }

    out
}

fn separator_before(sentence: &StructuredSentence, prev_type: Option<StructureType>) -> &'static str {
    if sentence.has_paragraph_break_hint() {
        return "\n\n";
    }
    match (prev_type, sentence.structure_type) {
        (Some(StructureType::Header), _) | (_, StructureType::Header) => "\n\n",
        (Some(StructureType::List), StructureType::List) => "\n",
        (Some(StructureType::Code), StructureType::Code) => "\n",
        (Some(StructureType::Table), StructureType::Table) => "\n",
        (Some(a), b) if a != b => "\n\n",
        _ => " ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sentence(text: &str, kind: StructureType, info: &str) -> StructuredSentence {
        sentence_with_indent(text, kind, info, 0)
    }

    fn sentence_with_indent(text: &str, kind: StructureType, info: &str, indent_level: u32) -> StructuredSentence {
        StructuredSentence {
            text: text.to_string(),
            line_number: 1,
            structure_type: kind,
            indent_level,
            structure_info: info.to_string(),
        }
    }

    #[test]
    fn plain_sentences_space_joined() {
        let sentences = vec![
            sentence("One.", StructureType::Plain, ""),
            sentence("Two.", StructureType::Plain, ""),
        ];
        assert_eq!(reconstruct_text(&sentences), "One. Two.");
    }

    #[test]
    fn header_is_reprefixed_with_hashes_and_blank_line_separated() {
        let sentences = vec![
            sentence("Intro", StructureType::Header, "header:1"),
            sentence("Body.", StructureType::Plain, ""),
        ];
        assert_eq!(reconstruct_text(&sentences), "# Intro\n\nBody.");
    }

    #[test]
    fn deeper_header_level_repeats_hash_accordingly() {
        let sentences = vec![sentence("Sub", StructureType::Header, "header:3")];
        assert_eq!(reconstruct_text(&sentences), "### Sub");
    }

    #[test]
    fn unordered_list_items_get_dash_marker_and_newline_joined() {
        let sentences = vec![
            sentence("Item one", StructureType::List, "list:unordered"),
            sentence("Item two", StructureType::List, "list:unordered"),
        ];
        assert_eq!(reconstruct_text(&sentences), "- Item one\n- Item two");
    }

    #[test]
    fn ordered_list_items_get_incrementing_numeric_marker() {
        let sentences = vec![
            sentence("First", StructureType::List, "list:ordered"),
            sentence("Second", StructureType::List, "list:ordered"),
            sentence("Third", StructureType::List, "list:ordered"),
        ];
        assert_eq!(reconstruct_text(&sentences), "1. First\n2. Second\n3. Third");
    }

    #[test]
    fn ordered_list_index_restarts_on_new_list_group() {
        let sentences = vec![
            sentence("First", StructureType::List, "list:ordered"),
            sentence("Second", StructureType::List, "list:ordered"),
            sentence("Between.", StructureType::Plain, ""),
            sentence("Restarted first", StructureType::List, "list:ordered"),
        ];
        let text = reconstruct_text(&sentences);
        assert!(text.ends_with("1. Restarted first"));
        assert!(text.contains("1. First\n2. Second"));
    }

    #[test]
    fn list_item_indentation_is_reapplied() {
        let sentences = vec![sentence_with_indent("Nested", StructureType::List, "list:unordered", 2)];
        assert_eq!(reconstruct_text(&sentences), "  - Nested");
    }

    #[test]
    fn nested_indent_change_restarts_ordered_group() {
        let sentences = vec![
            sentence_with_indent("Top", StructureType::List, "list:ordered", 0),
            sentence_with_indent("Nested", StructureType::List, "list:ordered", 1),
        ];
        assert_eq!(reconstruct_text(&sentences), "1. Top\n 1. Nested");
    }

    #[test]
    fn paragraph_break_hint_forces_blank_line() {
        let sentences = vec![
            sentence("First para.", StructureType::Plain, ""),
            sentence("Second para.", StructureType::Plain, "paragraph_break"),
        ];
        assert_eq!(reconstruct_text(&sentences), "First para.\n\nSecond para.");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(reconstruct_text(&[]), "");
    }
}
