//! HTTP clients for OpenAI-compatible chat-completions endpoints (spec
//! §4.4). Grounded on the registry crate's `check_response` status-code
//! dispatch and the content-filter's exponential-backoff retry loop.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;

use crate::error::LlmCallError;

/// Parameters for a single generation call.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A backend capable of generating a completion for a prompt.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams)
        -> Result<String, LlmCallError>;
}

/// Shared request/response plumbing for an OpenAI-compatible endpoint.
/// `LocalClient` and `RemoteClient` differ only in endpoint URL and
/// authorization header, so both wrap this struct.
struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ChatCompletionsClient {
    fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
            timeout,
        }
    }

    /// Sends the request, retrying timeouts once and 5xx responses up to
    /// `MAX_SERVER_ATTEMPTS` with exponential backoff. Malformed JSON in an
    /// otherwise-successful response is treated the same as a 5xx — the
    /// provider answered but the body can't be trusted, so it's worth one
    /// more round trip before giving up.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmCallError> {
        const MAX_SERVER_ATTEMPTS: u32 = 3;

        let body = json!({
            "model": params.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        });

        let mut timed_out_once = false;
        let mut server_attempt = 1u32;

        loop {
            let response = match self.send_once(&body).await {
                Ok(response) => response,
                Err(error) if error.is_timeout() && !timed_out_once => {
                    timed_out_once = true;
                    let jitter_ms = rand::rng().random_range(500..2000);
                    tokio::time::sleep(Duration::from_millis(jitter_ms)).await;
                    continue;
                }
                Err(error) if error.is_timeout() => return Err(LlmCallError::Timeout),
                Err(error) => return Err(LlmCallError::Transport(error)),
            };

            let status = response.status();
            if status.is_success() {
                match parse_content(response).await {
                    Ok(text) => return Ok(text),
                    Err(error) if server_attempt >= MAX_SERVER_ATTEMPTS => return Err(error),
                    Err(_) => {
                        // Malformed JSON in an otherwise-2xx response is treated as
                        // retriable, same backoff as a 5xx.
                        tokio::time::sleep(backoff_delay(server_attempt)).await;
                        server_attempt += 1;
                        continue;
                    }
                }
            }
            if status.is_client_error() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmCallError::ClientError {
                    status: status.as_u16(),
                    message,
                });
            }
            if server_attempt >= MAX_SERVER_ATTEMPTS {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmCallError::ServerError {
                    status: status.as_u16(),
                    attempts: server_attempt,
                    message,
                });
            }
            tokio::time::sleep(backoff_delay(server_attempt)).await;
            server_attempt += 1;
        }
    }

    async fn send_once(&self, body: &serde_json::Value) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self.http.post(&self.endpoint).json(body).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }
        request.send().await
    }
}

/// Exponential backoff with full jitter: `min(cap, base * factor^attempt)`
/// scaled by a uniform random factor in `[0, 1)`.
fn backoff_delay(attempt: u32) -> Duration {
    const BASE_MS: f64 = 500.0;
    const FACTOR: f64 = 2.0;
    const CAP_MS: f64 = 4000.0;
    let bound = (BASE_MS * FACTOR.powi(attempt as i32 - 1)).min(CAP_MS);
    let jittered = rand::rng().random_range(0.0..bound);
    Duration::from_millis(jittered as u64)
}

async fn parse_content(response: reqwest::Response) -> Result<String, LlmCallError> {
    let json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| LlmCallError::MalformedResponse(e.to_string()))?;
    json.pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LlmCallError::MalformedResponse("missing choices[0].message.content".into()))
}

/// Client for a locally-hosted OpenAI-compatible endpoint (e.g. Ollama, a
/// local vLLM server). No API key is sent by default.
pub struct LocalClient {
    inner: ChatCompletionsClient,
}

impl LocalClient {
    #[must_use]
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self {
            inner: ChatCompletionsClient::new(endpoint, None, timeout),
        }
    }
}

#[async_trait]
impl LlmClient for LocalClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmCallError> {
        self.inner.generate(prompt, params).await
    }
}

/// Client for a remote hosted provider, authenticated via bearer token.
pub struct RemoteClient {
    inner: ChatCompletionsClient,
}

impl RemoteClient {
    #[must_use]
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Self {
        Self {
            inner: ChatCompletionsClient::new(endpoint, Some(api_key), timeout),
        }
    }
}

#[async_trait]
impl LlmClient for RemoteClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmCallError> {
        self.inner.generate(prompt, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_delay_respects_cap() {
        for attempt in 1..=6 {
            let delay = backoff_delay(attempt);
            assert!(delay.as_millis() <= 4000);
        }
    }

    #[test]
    fn backoff_delay_grows_with_attempt_bound() {
        // Not a guarantee on any single sample (jitter), but the upper bound
        // for attempt 1 should never exceed the upper bound for attempt 3.
        let bound_1 = 500.0_f64;
        let bound_3 = (500.0 * 2f64.powi(2)).min(4000.0);
        assert!(bound_1 <= bound_3);
    }
}
