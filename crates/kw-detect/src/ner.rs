//! Pluggable named-entity tagger for the Stage D NER-Jaccard demotion rule
//! (spec §4.5). No implementation ships in this pipeline; the rule is a
//! no-op whenever no tagger is wired in.

use std::collections::HashSet;

/// Extracts a set of entity surface forms from a sentence. Implementors
/// may wrap an external NER model; none is provided here.
pub trait NerTagger: Send + Sync {
    fn entities(&self, text: &str) -> HashSet<String>;
}

/// Jaccard similarity between two entity sets. Returns `0.0` when both
/// sets are empty (no shared evidence either way).
#[must_use]
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn jaccard_identical_sets_is_one() {
        let a = set(&["Tokyo", "Japan"]);
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn jaccard_disjoint_sets_is_zero() {
        let a = set(&["Tokyo"]);
        let b = set(&["Osaka"]);
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_both_empty_is_zero() {
        let a = HashSet::new();
        assert_eq!(jaccard(&a, &a), 0.0);
    }
}
