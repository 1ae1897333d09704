//! Stage B: windowed anomaly detection (spec §4.3).
//!
//! For every gap Stage A left `Uncertain`, computes a robust z-score of
//! that gap's similarity against a local window of `window_k` neighboring
//! similarities on each side, and records whether it looks like a boundary
//! (`z >= tau`) or a continuation as a hint. Stage B never finalizes a
//! gap — it always stays `Uncertain`, now carrying that hint, and is
//! handed to Stage C for LLM adjudication. A gap whose local window has
//! zero spread (every similarity identical) gets no hint, since a z-score
//! is not meaningful there.

use crate::config::DetectorConfig;
use crate::decision::GapDecision;
use crate::stats::robust_z_score;

/// Annotate `decisions` with Stage B's windowed z-score hint; returns the
/// same-length vector. Already-resolved (Stage A) gaps pass through
/// unchanged; every other gap remains `Uncertain`, with `likely_boundary`
/// set from the local z-score when one could be computed.
#[must_use]
pub fn refine(
    similarities: &[f32],
    decisions: &[GapDecision],
    config: &DetectorConfig,
) -> Vec<GapDecision> {
    decisions
        .iter()
        .enumerate()
        .map(|(i, &decision)| {
            if !decision.is_uncertain() {
                return decision;
            }
            let window = local_window(similarities, i, config.window_k);
            let likely_boundary = robust_z_score(similarities[i], &window).map(|z| z >= config.tau);
            GapDecision::Uncertain { likely_boundary }
        })
        .collect()
}

/// Similarities within `window_k` positions of `index` on either side,
/// excluding `index` itself so the gap under test doesn't skew its own
/// baseline.
fn local_window(similarities: &[f32], index: usize, window_k: usize) -> Vec<f32> {
    let start = index.saturating_sub(window_k);
    let end = (index + window_k + 1).min(similarities.len());
    similarities[start..end]
        .iter()
        .enumerate()
        .filter(|(offset, _)| start + offset != index)
        .map(|(_, &s)| s)
        .collect()
}
