//! Chat message and conversation types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::language::Language;

/// Role of a message in a completion exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message sent to (or received from) the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Accumulated chat history for one session.
///
/// Index 0 is always the system message the conversation was started
/// with; everything after it is user/assistant pairs appended by
/// [`ConversationState::push_exchange`]. There is no way to remove or
/// reorder messages -- a conversation is replaced wholesale instead.
/// Only [`ConversationState::new`] constructs one; there is no
/// `Deserialize` impl.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationState {
    language: Language,
    messages: Vec<Message>,
}

impl ConversationState {
    /// Start a conversation with a single system message.
    pub fn new(language: Language, system_prompt: impl Into<String>) -> Self {
        Self {
            language,
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Append one completed user/assistant exchange.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(Message::user(user));
        self.messages.push(Message::assistant(assistant));
    }

    /// Language the conversation was started in.
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: a conversation holds at least its system message.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed user/assistant exchanges.
    pub fn turns(&self) -> usize {
        self.messages.len().saturating_sub(1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_serializes_to_wire_shape() {
        let json = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_new_conversation_has_only_system_message() {
        let convo = ConversationState::new(Language::Hindi, "be a songwriter");
        assert_eq!(convo.len(), 1);
        assert_eq!(convo.turns(), 0);
        assert_eq!(convo.messages()[0].role, MessageRole::System);
        assert_eq!(convo.language(), Language::Hindi);
    }

    #[test]
    fn test_push_exchange_appends_pair() {
        let mut convo = ConversationState::new(Language::English, "sys");
        convo.push_exchange("a memory", "[Verse 1] ...");
        convo.push_exchange("shorter please", "[Chorus] ...");

        let roles: Vec<MessageRole> = convo.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
            ]
        );
        assert_eq!(convo.turns(), 2);
        assert!(!convo.is_empty());
    }

    #[test]
    fn test_turns_counts_pairs_after_system_message() {
        let mut convo = ConversationState::new(Language::Telugu, "sys");
        convo.push_exchange("one", "uno");
        assert_eq!(convo.turns(), 1);

        let bare = ConversationState {
            language: Language::English,
            messages: Vec::new(),
        };
        assert_eq!(bare.turns(), 0);
    }
}
