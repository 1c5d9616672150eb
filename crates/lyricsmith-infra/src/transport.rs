//! OpenRouterTransport -- concrete [`ChatTransport`] for OpenRouter's
//! OpenAI-compatible chat completions endpoint.
//!
//! One call is one HTTP attempt. Retries, backoff and body parsing belong
//! to the completion client; this layer only classifies what went wrong.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use lyricsmith_core::completion::ChatTransport;
use lyricsmith_types::completion::{AttemptError, ChatCompletionRequest};
use lyricsmith_types::config::CompletionConfig;

/// HTTP transport for `{base_url}/chat/completions`.
///
/// Identifies the app to OpenRouter with `HTTP-Referer` and `X-Title`.
/// The API key is passed per call and only exposed when building the
/// `Authorization` header.
pub struct OpenRouterTransport {
    client: reqwest::Client,
    base_url: String,
    app_url: String,
    app_title: String,
}

impl OpenRouterTransport {
    /// Build a transport with a per-attempt timeout of `config.timeout_secs`.
    pub fn new(config: &CompletionConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            app_url: config.app_url.clone(),
            app_title: config.app_title.clone(),
        })
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, reqwest::Error> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl ChatTransport for OpenRouterTransport {
    async fn send(
        &self,
        request: &ChatCompletionRequest,
        api_key: &SecretString,
    ) -> Result<String, AttemptError> {
        let response = self
            .client
            .post(self.url())
            .bearer_auth(api_key.expose_secret())
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", &self.app_title)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "completion endpoint returned error status");
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

fn classify(err: reqwest::Error) -> AttemptError {
    if err.is_timeout() {
        AttemptError::Timeout
    } else if err.is_connect() {
        AttemptError::Connect(err.to_string())
    } else {
        AttemptError::Transport(err.to_string())
    }
}
