//! LLM client and router error types.

use thiserror::Error;

/// Errors raised by an individual provider call.
#[derive(Debug, Error)]
pub enum LlmCallError {
    /// HTTP transport error (connection refused, DNS failure, etc.).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The call did not complete within the configured timeout, even after
    /// the single timeout retry.
    #[error("request timed out after retry")]
    Timeout,

    /// A non-retriable 4xx response (bad request, auth failure, etc.).
    #[error("client error ({status}): {message}")]
    ClientError { status: u16, message: String },

    /// A 5xx response that exhausted its retry budget.
    #[error("server error ({status}) after {attempts} attempts: {message}")]
    ServerError {
        status: u16,
        attempts: u32,
        message: String,
    },

    /// The response body was not the expected OpenAI-compatible shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LlmCallError {
    /// Whether this error is the kind the retry loop already exhausted its
    /// budget on, vs. one that never should have been retried in the first
    /// place. Used by the router to decide whether a provider switch (in
    /// `auto` mode) is worth attempting.
    #[must_use]
    pub const fn is_retriable_class(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout | Self::ServerError { .. }
        )
    }
}

/// Errors raised by the router itself, independent of any single provider
/// call.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No provider is configured for the requested mode.
    #[error("no provider available for mode '{0}'")]
    NoProvider(String),

    /// Every configured provider failed; carries the last underlying error.
    #[error("all providers failed, last error: {0}")]
    AllProvidersFailed(#[source] LlmCallError),
}
