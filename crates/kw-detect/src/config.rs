//! Detector configuration (spec §4.3, §4.4, §4.5's structural overrides).

use serde::{Deserialize, Serialize};

const fn default_theta_high() -> f32 {
    0.85
}

const fn default_theta_low() -> f32 {
    0.55
}

const fn default_window_k() -> usize {
    5
}

const fn default_tau() -> f32 {
    3.5
}

fn default_connectives() -> Vec<String> {
    ["また", "そして", "なお", "however", "additionally", "furthermore"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_short_connective_max_chars() -> usize {
    12
}

const fn default_large_indent_delta() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

const fn default_ner_jaccard_threshold() -> f32 {
    0.5
}

/// Tunables for all four detector stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DetectorConfig {
    /// Stage A: cosine similarity at or above this is a confident
    /// non-boundary.
    #[serde(default = "default_theta_high")]
    pub theta_high: f32,

    /// Stage A: cosine similarity at or below this is a confident
    /// boundary. Between `theta_low` and `theta_high` is "uncertain" and
    /// falls through to Stage B.
    #[serde(default = "default_theta_low")]
    pub theta_low: f32,

    /// Stage B: number of similarity samples on each side of an uncertain
    /// gap used to compute the local median/MAD.
    #[serde(default = "default_window_k")]
    pub window_k: usize,

    /// Stage B: robust z-score magnitude above which a gap is flagged
    /// anomalous (a boundary).
    #[serde(default = "default_tau")]
    pub tau: f32,

    /// Stage D: maximum character length for a sentence to be eligible
    /// for the short-connective demotion rule.
    #[serde(default = "default_short_connective_max_chars")]
    pub short_connective_max_chars: usize,

    /// Stage D: sentence-initial tokens that, on a short sentence, demote
    /// a boundary back to false (continuation cues).
    #[serde(default = "default_connectives")]
    pub connectives: Vec<String>,

    /// Stage D: an indent-level jump of at least this much forces a
    /// boundary even if earlier stages disagreed.
    #[serde(default = "default_large_indent_delta")]
    pub large_indent_delta: u32,

    /// Stage D: enable the NER-Jaccard demotion rule. A no-op when no NER
    /// tagger is wired in, regardless of this flag.
    #[serde(default = "default_true")]
    pub ner_demotion_enabled: bool,

    /// Minimum Jaccard overlap between adjacent sentences' entity sets
    /// for the NER demotion rule to fire.
    #[serde(default = "default_ner_jaccard_threshold")]
    pub ner_jaccard_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            theta_high: default_theta_high(),
            theta_low: default_theta_low(),
            window_k: default_window_k(),
            tau: default_tau(),
            short_connective_max_chars: default_short_connective_max_chars(),
            connectives: default_connectives(),
            large_indent_delta: default_large_indent_delta(),
            ner_demotion_enabled: true,
            ner_jaccard_threshold: 0.5,
        }
    }
}

impl DetectorConfig {
    /// # Errors
    ///
    /// Returns an error message if `theta_low >= theta_high`.
    pub fn validate(&self) -> Result<(), String> {
        if self.theta_low >= self.theta_high {
            return Err(format!(
                "theta_low ({}) must be less than theta_high ({})",
                self.theta_low, self.theta_high
            ));
        }
        Ok(())
    }
}
