//! Core data model shared by the pre-processor, detector, and builder.
//!
//! Mirrors spec §3: a `StructuredSentence` is the unit the pre-processor
//! emits and the detector/builder consume; a `Chunk` is the unit the writer
//! persists.

use serde::{Deserialize, Serialize};

/// The structural role of a line or sentence, per spec §3/§4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Plain,
    Header,
    List,
    Code,
    Table,
    /// Never reaches the detector; filtered out in the pre-processor.
    Blank,
}

impl StructureType {
    #[must_use]
    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// A single sentence tagged with document-structural metadata.
///
/// Invariants (spec §3): no `Blank`-typed sentence ever reaches the
/// detector; `line_number` is non-decreasing across a stream; `text` is
/// non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSentence {
    /// Sentence body, trimmed of enclosing whitespace, internal spacing
    /// preserved.
    pub text: String,

    /// 1-indexed line in the source where the sentence begins.
    pub line_number: u32,

    /// Structural role of the region this sentence was extracted from.
    pub structure_type: StructureType,

    /// Leading indentation, in configured tab-width units.
    pub indent_level: u32,

    /// Opaque annotation (e.g. `"header:2"`, `"list:unordered"`), treated by
    /// the detector as an enum-like tag. May carry `"paragraph_break"` as a
    /// hint left by a blank line immediately preceding this sentence.
    pub structure_info: String,
}

impl StructuredSentence {
    #[must_use]
    pub fn has_paragraph_break_hint(&self) -> bool {
        self.structure_info.contains("paragraph_break")
    }

    /// Heading level parsed out of `structure_info` (e.g. `"header:2"` → 2).
    #[must_use]
    pub fn header_level(&self) -> Option<u8> {
        if self.structure_type != StructureType::Header {
            return None;
        }
        self.structure_info
            .split(':')
            .nth(1)
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.parse().ok())
    }

    /// Whether the `structure_info` tag marks this list item as ordered.
    #[must_use]
    pub fn is_ordered_list(&self) -> bool {
        self.structure_type == StructureType::List && self.structure_info.contains("list:ordered")
    }
}

/// Structural summary attached to each emitted chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Distinct heading levels present among the chunk's sentences, in
    /// order of first appearance.
    pub heading_levels: Vec<u8>,

    /// Whether the chunk spans a list region.
    pub spans_list: bool,

    /// Inclusive `(first_line, last_line)` of the chunk's sentences.
    pub line_range: (u32, u32),
}

/// A topic-coherent run of sentences, ready for persistence (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub sentences: Vec<StructuredSentence>,
    pub text: String,
    pub token_count: usize,
    pub char_count: usize,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Build chunk metadata from its sentences.
    #[must_use]
    pub fn metadata_from(sentences: &[StructuredSentence]) -> ChunkMetadata {
        let mut heading_levels = Vec::new();
        let mut spans_list = false;
        let mut first_line = u32::MAX;
        let mut last_line = 0u32;

        for sentence in sentences {
            if let Some(level) = sentence.header_level()
                && !heading_levels.contains(&level)
            {
                heading_levels.push(level);
            }
            if sentence.structure_type == StructureType::List {
                spans_list = true;
            }
            first_line = first_line.min(sentence.line_number);
            last_line = last_line.max(sentence.line_number);
        }

        ChunkMetadata {
            heading_levels,
            spans_list,
            line_range: if sentences.is_empty() {
                (0, 0)
            } else {
                (first_line, last_line)
            },
        }
    }
}
