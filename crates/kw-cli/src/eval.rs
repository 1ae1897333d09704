//! Precision/recall/F1 evaluation against a gold-labeled boundary set.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use kw_config::RunConfig;
use kw_llm::ProviderRouter;

/// Boundary-classification counts, scored per-gap rather than per-chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_negative: usize,
}

impl ConfusionMatrix {
    #[must_use]
    pub fn precision(&self) -> f64 {
        let denom = self.true_positive + self.false_positive;
        if denom == 0 {
            0.0
        } else {
            self.true_positive as f64 / denom as f64
        }
    }

    #[must_use]
    pub fn recall(&self) -> f64 {
        let denom = self.true_positive + self.false_negative;
        if denom == 0 {
            0.0
        } else {
            self.true_positive as f64 / denom as f64
        }
    }

    #[must_use]
    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}

/// Gold file format: one 1-indexed sentence number per line, naming the
/// sentence after which a boundary should fall. Blank lines and anything
/// that doesn't parse as an integer are skipped.
#[must_use]
pub fn parse_gold(content: &str) -> HashSet<usize> {
    content
        .lines()
        .filter_map(|line| line.trim().parse::<usize>().ok())
        .collect()
}

/// Score `predicted` against `gold`. The final gap is excluded: `finalize`
/// always forces it `true`, so it carries no discriminative signal about
/// detector quality.
#[must_use]
pub fn score(predicted: &[bool], gold: &HashSet<usize>) -> ConfusionMatrix {
    let mut matrix = ConfusionMatrix::default();
    let scored_len = predicted.len().saturating_sub(1);
    for (index, &is_boundary) in predicted.iter().enumerate().take(scored_len) {
        let sentence_number = index + 1;
        let is_gold = gold.contains(&sentence_number);
        match (is_boundary, is_gold) {
            (true, true) => matrix.true_positive += 1,
            (true, false) => matrix.false_positive += 1,
            (false, true) => matrix.false_negative += 1,
            (false, false) => matrix.true_negative += 1,
        }
    }
    matrix
}

/// Run detection over `input` and score it against the gold file at
/// `gold_path`.
pub async fn run(
    input: &Path,
    gold_path: &Path,
    config: &RunConfig,
    router: &ProviderRouter,
) -> Result<ConfusionMatrix> {
    let gold_content = std::fs::read_to_string(gold_path)
        .with_context(|| format!("failed to read gold file '{}'", gold_path.display()))?;
    let gold = parse_gold(&gold_content);
    let (_, boundaries) = crate::pipeline::detect(input, config, router).await?;
    Ok(score(&boundaries, &gold))
}
