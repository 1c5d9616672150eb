//! ChatTransport trait definition.
//!
//! One call to [`ChatTransport::send`] is one HTTP attempt. Retries live in
//! [`super::CompletionClient`], never in the transport.

use secrecy::SecretString;

use lyricsmith_types::completion::{AttemptError, ChatCompletionRequest};

/// Sends a single chat-completion request to the endpoint.
///
/// Implementations live in lyricsmith-infra (e.g., `OpenRouterTransport`).
/// On a 2xx response the raw body is returned unparsed; every other outcome
/// is reported as an [`AttemptError`] variant.
pub trait ChatTransport: Send + Sync {
    fn send(
        &self,
        request: &ChatCompletionRequest,
        api_key: &SecretString,
    ) -> impl std::future::Future<Output = Result<String, AttemptError>> + Send;
}
