//! LLM provider and router configuration (spec §4.4, §6).

use serde::{Deserialize, Serialize};

/// Which provider(s) the router dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderMode {
    /// Local-only; never calls out to a remote endpoint.
    #[default]
    Local,
    /// Remote-only.
    Remote,
    /// Prefer local, fail over to remote on error (spec §9 open question:
    /// failover is automatic but warns, never silent).
    Auto,
}

fn default_model() -> String {
    String::from("llama3")
}

const fn default_temperature() -> f32 {
    0.0
}

const fn default_max_tokens() -> u32 {
    256
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_n_vote() -> u32 {
    3
}

const fn default_concurrency() -> usize {
    4
}

fn default_local_endpoint() -> String {
    String::from("http://localhost:11434/v1/chat/completions")
}

fn default_remote_endpoint() -> String {
    String::from("https://api.openai.com/v1/chat/completions")
}

fn default_api_key_env() -> String {
    String::from("KW_LLM_API_KEY")
}

/// Settings shared by the local and remote HTTP clients, plus the vote
/// count used by Stage C adjudication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    #[serde(default)]
    pub mode: ProviderMode,

    #[serde(default = "default_local_endpoint")]
    pub local_endpoint: String,

    #[serde(default = "default_remote_endpoint")]
    pub remote_endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the remote API key. The
    /// key's value itself is never stored in config.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of independent adjudication calls per candidate boundary
    /// (spec §4.4 Stage C majority vote).
    #[serde(default = "default_n_vote")]
    pub n_vote: u32,

    /// Maximum number of in-flight LLM calls.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            local_endpoint: default_local_endpoint(),
            remote_endpoint: default_remote_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            n_vote: default_n_vote(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Failover behavior when `mode` is [`ProviderMode::Auto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FailoverConfig {
    /// Whether failover from local to remote is permitted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// When `true` (the only behavior this pipeline implements, per the
    /// resolved open question), a failover is always logged as a warning —
    /// it is never silent.
    #[serde(default = "default_true")]
    pub warn_only: bool,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn_only: true,
        }
    }
}
