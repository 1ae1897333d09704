//! Configuration loading and provider-router construction shared by every
//! subcommand.

use anyhow::{Context, Result};
use kw_config::RunConfig;
use kw_llm::{ProviderMode, ProviderRouter};

/// Load the layered configuration, applying `--force-remote` as a post-load
/// override (it intentionally never participates in the figment merge —
/// it's a one-shot CLI flag, not a persisted setting).
pub fn load_config(force_remote: bool) -> Result<RunConfig> {
    let mut config = RunConfig::load().context("failed to load configuration")?;
    if force_remote {
        config.llm.mode = ProviderMode::Remote;
    }
    Ok(config)
}

/// Build a provider router, resolving the remote API key from the
/// environment variable named by `config.llm.api_key_env`. Absence of the
/// variable is not an error here; `ProviderRouter::new` simply declines to
/// build a remote client.
pub fn build_router(config: &RunConfig) -> ProviderRouter {
    let api_key = std::env::var(&config.llm.api_key_env).ok();
    ProviderRouter::new(&config.llm, config.failover.clone(), api_key)
}
