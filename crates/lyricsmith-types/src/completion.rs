//! Chat-completion wire types and the completion error taxonomy.
//!
//! The wire types model the OpenAI-compatible `/chat/completions` shape
//! used by OpenRouter: `{model, messages, temperature, max_tokens}` in,
//! `{choices: [{message: {content}}]}` or `{error: {message}}` out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::Message;

/// HTTP status the endpoint returns when its upstream model host is down.
pub const STATUS_BAD_GATEWAY: u16 = 502;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Request body for one chat-completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Success body. Only the fields Lyricsmith reads are modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body: `{"error": {"message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of a single failed transport attempt.
///
/// The retry loop decides what to do purely from the variant (and the
/// status code for [`AttemptError::Status`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl AttemptError {
    /// Timeouts, connection failures and 502 are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Status { status, .. } => *status == STATUS_BAD_GATEWAY,
            AttemptError::Timeout | AttemptError::Connect(_) => true,
            AttemptError::Transport(_) => false,
        }
    }
}

/// Terminal failure of a completion call.
///
/// `Display` is the short message shown to end users. It never contains
/// the API credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("The completion API key is not configured. Please contact the site administrator.")]
    Configuration,

    #[error("The AI service rejected our credentials. Please contact the site administrator.")]
    Auth,

    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("The AI service is temporarily unavailable. Please try again in a few moments.")]
    ServiceUnavailable,

    #[error("The request timed out. Please try again.")]
    Timeout,

    #[error("Could not connect to the AI service. Please check your internet connection.")]
    Connectivity,

    #[error("Received an unexpected response from the AI service: {0}")]
    Protocol(String),

    #[error("API error: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to generate a response after multiple attempts.")]
    ExhaustedRetries,
}

impl CompletionError {
    /// Human-readable message for the end user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Stable machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Configuration => "configuration",
            CompletionError::Auth => "auth",
            CompletionError::RateLimited => "rate_limited",
            CompletionError::ServiceUnavailable => "service_unavailable",
            CompletionError::Timeout => "timeout",
            CompletionError::Connectivity => "connectivity",
            CompletionError::Protocol(_) => "protocol",
            CompletionError::Upstream { .. } => "upstream",
            CompletionError::Network(_) => "network",
            CompletionError::ExhaustedRetries => "exhausted_retries",
        }
    }
}
