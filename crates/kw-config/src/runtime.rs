//! Process-wide runtime settings not owned by any single pipeline stage.

use serde::{Deserialize, Serialize};

const fn default_worker_concurrency() -> usize {
    4
}

/// General, stage-independent knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuntimeConfig {
    /// Upper bound on concurrent document-processing pipelines when
    /// running over a directory of inputs.
    #[serde(default = "default_worker_concurrency")]
    pub worker_concurrency: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_concurrency: default_worker_concurrency(),
        }
    }
}
