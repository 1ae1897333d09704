//! Per-gap boundary decision shared across all four stages.
//!
//! A "gap" is the space between sentence `i` and sentence `i + 1`; there
//! are `sentences.len() - 1` gaps for a non-empty sentence stream. Each
//! stage either leaves a gap's decision alone or resolves it; only
//! [`GapDecision::Uncertain`] gaps are handed to the next stage.

/// The outcome of evaluating a single gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapDecision {
    Boundary,
    NotBoundary,
    /// Not yet decided. `likely_boundary` carries Stage B's windowed
    /// z-score hint (`Some(true)` = likely boundary, `Some(false)` =
    /// likely continuation) once computed; `None` before Stage B runs, or
    /// when its local window has zero spread and no z-score is meaningful.
    /// Stage B never finalizes a gap itself — only Stage A's confident
    /// thresholds and Stage C's LLM adjudication produce `Boundary`/
    /// `NotBoundary`.
    Uncertain { likely_boundary: Option<bool> },
}

impl GapDecision {
    #[must_use]
    pub const fn is_uncertain(self) -> bool {
        matches!(self, Self::Uncertain { .. })
    }

    #[must_use]
    pub const fn as_bool(self) -> bool {
        matches!(self, Self::Boundary)
    }

    /// The `Uncertain` state Stage A produces, before any windowed hint
    /// exists.
    #[must_use]
    pub const fn no_hint() -> Self {
        Self::Uncertain {
            likely_boundary: None,
        }
    }
}

/// Finalize a decision vector into the boolean-per-sentence form the
/// builder expects: `result[i]` is `true` iff a boundary falls after
/// sentence `i`. Any gap still `Uncertain` at this point resolves to
/// `false` (no boundary) — the caller is expected to have run Stage C
/// before reaching here so this only matters if Stage C's LLM calls all
/// failed and no fallback hint was available.
#[must_use]
pub fn finalize(gaps: &[GapDecision], sentence_count: usize) -> Vec<bool> {
    assert_eq!(gaps.len() + 1, sentence_count.max(1), "gap count must be sentence_count - 1");
    let mut out: Vec<bool> = gaps.iter().map(|g| g.as_bool()).collect();
    out.push(true); // the document's final sentence always closes the final chunk
    out
}
