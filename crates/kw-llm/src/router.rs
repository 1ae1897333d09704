//! Provider router (spec §4.4): dispatches generation calls to the
//! configured backend(s), bounding concurrency with a semaphore the same
//! way the registry crate's `search_all` bounds its concurrent ecosystem
//! fan-out with `tokio::join!` — here generalized to an arbitrary call
//! count via `Semaphore` rather than a fixed join of N futures, since the
//! detector's vote count is configurable.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::client::{GenerationParams, LlmClient, LocalClient, RemoteClient};
use crate::config::{FailoverConfig, LlmConfig, ProviderMode};
use crate::error::{LlmCallError, RouterError};

/// Routes generation calls to a local and/or remote [`LlmClient`],
/// enforcing a global concurrency cap.
pub struct ProviderRouter {
    mode: ProviderMode,
    failover: FailoverConfig,
    local: Option<Arc<dyn LlmClient>>,
    remote: Option<Arc<dyn LlmClient>>,
    semaphore: Arc<Semaphore>,
    params: GenerationParams,
}

impl ProviderRouter {
    /// Build a router from configuration. `api_key` is the resolved value
    /// of the environment variable named by `config.api_key_env`; pass
    /// `None` when running in local-only mode without a remote fallback.
    #[must_use]
    pub fn new(config: &LlmConfig, failover: FailoverConfig, api_key: Option<String>) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let local: Option<Arc<dyn LlmClient>> = match config.mode {
            ProviderMode::Local | ProviderMode::Auto => Some(Arc::new(LocalClient::new(
                config.local_endpoint.clone(),
                timeout,
            ))),
            ProviderMode::Remote => None,
        };
        let remote: Option<Arc<dyn LlmClient>> = match config.mode {
            ProviderMode::Remote | ProviderMode::Auto => {
                api_key.map(|key| -> Arc<dyn LlmClient> {
                    Arc::new(RemoteClient::new(config.remote_endpoint.clone(), key, timeout))
                })
            }
            ProviderMode::Local => None,
        };

        Self {
            mode: config.mode,
            failover,
            local,
            remote,
            semaphore: Arc::new(Semaphore::new(config.concurrency.max(1))),
            params: GenerationParams {
                model: config.model.clone(),
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
        }
    }

    /// Generate a completion, bounded by the router's concurrency cap.
    /// In [`ProviderMode::Auto`], a local failure fails over to remote
    /// (logged as a warning, per the resolved open question that failover
    /// is automatic but never silent); other modes call their single
    /// configured provider directly.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NoProvider`] if the selected mode has no
    /// client configured (e.g. `remote` mode without an API key), or
    /// [`RouterError::AllProvidersFailed`] if every attempted provider
    /// errored.
    pub async fn generate(&self, prompt: &str) -> Result<String, RouterError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("semaphore is never closed");

        match self.mode {
            ProviderMode::Local => self.call_single(&self.local, "local", prompt).await,
            ProviderMode::Remote => self.call_single(&self.remote, "remote", prompt).await,
            ProviderMode::Auto => self.call_with_failover(prompt).await,
        }
    }

    async fn call_single(
        &self,
        client: &Option<Arc<dyn LlmClient>>,
        name: &str,
        prompt: &str,
    ) -> Result<String, RouterError> {
        let client = client
            .as_ref()
            .ok_or_else(|| RouterError::NoProvider(name.to_string()))?;
        client
            .generate(prompt, &self.params)
            .await
            .map_err(RouterError::AllProvidersFailed)
    }

    async fn call_with_failover(&self, prompt: &str) -> Result<String, RouterError> {
        let Some(local) = &self.local else {
            return self.call_single(&self.remote, "remote", prompt).await;
        };

        match local.generate(prompt, &self.params).await {
            Ok(text) => Ok(text),
            Err(local_error) => {
                if !self.failover.enabled {
                    return Err(RouterError::AllProvidersFailed(local_error));
                }
                let Some(remote) = &self.remote else {
                    return Err(RouterError::AllProvidersFailed(local_error));
                };
                if self.failover.warn_only {
                    tracing::warn!(error = %local_error, "local provider failed, failing over to remote");
                }
                remote
                    .generate(prompt, &self.params)
                    .await
                    .map_err(RouterError::AllProvidersFailed)
            }
        }
    }
}

/// Whether a call error class is worth a second attempt against a
/// different provider in `auto` mode, independent of the per-client retry
/// budget already spent inside [`LlmClient::generate`].
#[must_use]
pub fn worth_failover(error: &LlmCallError) -> bool {
    error.is_retriable_class()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_with_no_remote_in_remote_mode_has_no_provider() {
        let config = LlmConfig {
            mode: ProviderMode::Remote,
            ..LlmConfig::default()
        };
        let router = ProviderRouter::new(&config, FailoverConfig::default(), None);
        assert!(router.remote.is_none());
    }

    #[test]
    fn router_in_local_mode_never_builds_remote_client() {
        let config = LlmConfig {
            mode: ProviderMode::Local,
            ..LlmConfig::default()
        };
        let router = ProviderRouter::new(&config, FailoverConfig::default(), Some("key".into()));
        assert!(router.remote.is_none());
        assert!(router.local.is_some());
    }

    #[test]
    fn auto_mode_builds_both_when_key_present() {
        let config = LlmConfig {
            mode: ProviderMode::Auto,
            ..LlmConfig::default()
        };
        let router = ProviderRouter::new(&config, FailoverConfig::default(), Some("key".into()));
        assert!(router.local.is_some());
        assert!(router.remote.is_some());
    }
}
