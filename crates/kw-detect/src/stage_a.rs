//! Stage A: embedding screen (spec §4.3).
//!
//! Classifies every gap by the cosine similarity of its neighboring
//! sentence embeddings: similarity at or above `theta_high` is a
//! confident non-boundary, at or below `theta_low` is a confident
//! boundary, and anything between is left `Uncertain` for Stage B.

use crate::config::DetectorConfig;
use crate::decision::GapDecision;
use crate::stats::cosine_similarity;

/// Similarity for every gap, in document order. Exposed separately from
/// [`screen`] so Stage B can reuse the same similarity sequence for its
/// windowed statistics without recomputing cosine similarities.
#[must_use]
pub fn gap_similarities(embeddings: &[Vec<f32>]) -> Vec<f32> {
    embeddings
        .windows(2)
        .map(|pair| cosine_similarity(&pair[0], &pair[1]))
        .collect()
}

/// Classify every gap from its similarity alone.
#[must_use]
pub fn screen(similarities: &[f32], config: &DetectorConfig) -> Vec<GapDecision> {
    similarities
        .iter()
        .map(|&sim| {
            if sim >= config.theta_high {
                GapDecision::NotBoundary
            } else if sim <= config.theta_low {
                GapDecision::Boundary
            } else {
                GapDecision::no_hint()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn high_similarity_is_not_boundary() {
        let config = DetectorConfig::default();
        let decisions = screen(&[0.95], &config);
        assert_eq!(decisions, vec![GapDecision::NotBoundary]);
    }

    #[test]
    fn low_similarity_is_boundary() {
        let config = DetectorConfig::default();
        let decisions = screen(&[0.2], &config);
        assert_eq!(decisions, vec![GapDecision::Boundary]);
    }

    #[test]
    fn middling_similarity_is_uncertain() {
        let config = DetectorConfig::default();
        let decisions = screen(&[0.7], &config);
        assert_eq!(decisions, vec![GapDecision::no_hint()]);
    }

    #[test]
    fn gap_similarities_count_is_n_minus_one() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
        assert_eq!(gap_similarities(&embeddings).len(), 2);
    }
}
