//! Completion client with bounded retries.
//!
//! [`CompletionClient`] serializes a message list into a
//! [`ChatCompletionRequest`], hands it to a [`ChatTransport`] and applies
//! the [`RetryPolicy`]:
//!
//! | attempt outcome          | action                                   |
//! |--------------------------|------------------------------------------|
//! | 2xx                      | parse `choices[0].message.content`, trim |
//! | 502                      | retry, linear backoff                    |
//! | timeout / connect error  | retry, fixed backoff                     |
//! | 401 / 429 / other status | fail immediately                         |
//! | other transport error    | fail immediately                         |
//!
//! The client holds no mutable state and can be shared across tasks.

pub mod retry;
pub mod transport;

use secrecy::SecretString;
use tracing::{Instrument, debug, info_span, warn};

use lyricsmith_types::completion::{ChatCompletionRequest, ChatCompletionResponse, CompletionError};
use lyricsmith_types::config::CompletionConfig;
use lyricsmith_types::message::Message;

pub use self::retry::{Disposition, RetryPolicy};
pub use self::transport::ChatTransport;

/// Chat-completion client generic over its transport.
///
/// # API Key Security
///
/// Does NOT derive Debug. The key is a [`SecretString`] and is only
/// exposed by the transport when building request headers.
pub struct CompletionClient<T> {
    transport: T,
    api_key: Option<SecretString>,
    model: String,
    temperature: f64,
    max_tokens: u32,
    policy: RetryPolicy,
}

impl<T: ChatTransport> CompletionClient<T> {
    /// Create a client with default sampling parameters and retry policy.
    ///
    /// A missing `api_key` is not an error here; every call fails with
    /// [`CompletionError::Configuration`] instead.
    pub fn new(transport: T, api_key: Option<SecretString>, model: impl Into<String>) -> Self {
        let defaults = CompletionConfig::default();
        Self {
            transport,
            api_key,
            model: model.into(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            policy: RetryPolicy::default(),
        }
    }

    /// Create a client from the `[completion]` config section.
    pub fn from_config(transport: T, api_key: Option<SecretString>, config: &CompletionConfig) -> Self {
        Self {
            transport,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            policy: RetryPolicy::new(
                config.max_retries,
                std::time::Duration::from_millis(config.backoff_ms),
            ),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override only the retry budget, keeping the backoff unit.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.policy.max_retries = max_retries;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether an API key is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, messages: &[Message]) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Send `messages` and return the trimmed text of the first choice.
    pub async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(CompletionError::Configuration);
        };

        let request = self.build_request(messages);
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.operation.name = "chat",
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = request.temperature,
            messages = request.messages.len(),
        );

        self.run_attempts(&request, api_key).instrument(span).await
    }

    async fn run_attempts(
        &self,
        request: &ChatCompletionRequest,
        api_key: &SecretString,
    ) -> Result<String, CompletionError> {
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            let outcome = self.transport.send(request, api_key).await;

            let error = match outcome {
                Ok(body) => {
                    debug!(attempt, "completion succeeded");
                    return parse_completion_body(&body);
                }
                Err(error) => error,
            };

            match self.policy.disposition(error.clone(), attempt) {
                Disposition::Fail(terminal) => {
                    warn!(attempt, kind = terminal.kind(), %error, "completion failed");
                    return Err(terminal);
                }
                Disposition::Retry { exhausted, .. } if attempt == max_attempts => {
                    warn!(attempt, kind = exhausted.kind(), %error, "completion retries exhausted");
                    return Err(exhausted);
                }
                Disposition::Retry { delay, .. } => {
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        %error,
                        "transient completion failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(CompletionError::ExhaustedRetries)
    }
}

/// Extract the trimmed text of `choices[0].message.content`.
pub fn parse_completion_body(body: &str) -> Result<String, CompletionError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::Protocol(format!("invalid JSON body: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::Protocol("response contained no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| CompletionError::Protocol("first choice has no content".to_string()))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CompletionError::Protocol("first choice content is empty".to_string()));
    }
    Ok(trimmed.to_string())
}
