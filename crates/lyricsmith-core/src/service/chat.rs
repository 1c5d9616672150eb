//! Conversational lyric writing.
//!
//! Each session carries one [`ConversationState`]. A message in a language
//! other than the one the conversation was started in replaces it with a
//! fresh conversation seeded by that language's system prompt.

use std::sync::Arc;

use tracing::{debug, info};

use lyricsmith_types::error::{ServiceError, ValidationError};
use lyricsmith_types::language::Language;
use lyricsmith_types::message::{ConversationState, Message};
use lyricsmith_types::session::SessionId;

use crate::completion::{ChatTransport, CompletionClient};
use crate::prompt::create_chat_system_prompt;
use crate::session::SessionStore;

/// Longest chat message accepted (matches the chat box counter).
pub const MAX_CHAT_MESSAGE_CHARS: usize = 2_000;

/// Chat flow over a shared completion client and session store.
pub struct ChatService<T, S> {
    client: Arc<CompletionClient<T>>,
    store: Arc<S>,
}

impl<T, S> ChatService<T, S>
where
    T: ChatTransport,
    S: SessionStore,
{
    pub fn new(client: Arc<CompletionClient<T>>, store: Arc<S>) -> Self {
        Self { client, store }
    }

    /// Send one user message and return the assistant's reply.
    ///
    /// The stored conversation only changes when the completion succeeds,
    /// so a failed call can simply be retried by the user. Exchanges stored
    /// by overlapping requests on the same session are kept.
    pub async fn send(
        &self,
        session: &SessionId,
        message: &str,
        language: Language,
    ) -> Result<String, ServiceError> {
        let message = validate_message(message)?;

        let conversation = match self.store.get_conversation(session).await? {
            Some(existing) if existing.language() == language => existing,
            Some(existing) => {
                info!(
                    %session,
                    from = %existing.language(),
                    to = %language,
                    "language changed, starting a new conversation"
                );
                start_conversation(language)
            }
            None => {
                debug!(%session, %language, "starting conversation");
                start_conversation(language)
            }
        };

        let mut messages: Vec<Message> = conversation.messages().to_vec();
        messages.push(Message::user(message));

        let reply = self.client.complete(&messages).await?;

        let mut conversation = self.merge_target(session, conversation).await?;
        conversation.push_exchange(message, reply.as_str());
        debug!(%session, turns = conversation.turns(), "conversation updated");
        self.store.put_conversation(session, conversation).await?;

        Ok(reply)
    }

    /// Pick the conversation the new exchange is appended to.
    ///
    /// Another request on the same session may have stored exchanges while
    /// the completion was in flight. If the stored conversation still
    /// extends `sent`, the exchange goes on top of it. If it was cleared or
    /// replaced, `sent` wins. The re-read and the write are not atomic, so
    /// two requests finishing at the same instant can still lose one.
    async fn merge_target(
        &self,
        session: &SessionId,
        sent: ConversationState,
    ) -> Result<ConversationState, ServiceError> {
        match self.store.get_conversation(session).await? {
            Some(current)
                if current.language() == sent.language()
                    && current.len() > sent.len()
                    && current.messages().starts_with(sent.messages()) =>
            {
                debug!(
                    %session,
                    concurrent = (current.len() - sent.len()) / 2,
                    "appending after exchanges stored while waiting"
                );
                Ok(current)
            }
            _ => Ok(sent),
        }
    }

    /// Current conversation for a session, if any.
    pub async fn conversation(
        &self,
        session: &SessionId,
    ) -> Result<Option<ConversationState>, ServiceError> {
        Ok(self.store.get_conversation(session).await?)
    }

    /// Forget the session's conversation. Returns whether one existed.
    pub async fn clear(&self, session: &SessionId) -> Result<bool, ServiceError> {
        let existed = self.store.delete_conversation(session).await?;
        debug!(%session, existed, "conversation cleared");
        Ok(existed)
    }
}

fn start_conversation(language: Language) -> ConversationState {
    ConversationState::new(language, create_chat_system_prompt(language))
}

fn validate_message(message: &str) -> Result<&str, ValidationError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    let chars = trimmed.chars().count();
    if chars > MAX_CHAT_MESSAGE_CHARS {
        return Err(ValidationError::TooLong {
            field: "message",
            max: MAX_CHAT_MESSAGE_CHARS,
            actual: chars,
        });
    }
    Ok(trimmed)
}
