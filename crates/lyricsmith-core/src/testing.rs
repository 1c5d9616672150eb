//! Test doubles shared by the core unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tokio::time::Instant;

use lyricsmith_types::completion::{AttemptError, ChatCompletionRequest};
use lyricsmith_types::error::StoreError;
use lyricsmith_types::generation::GenerationResult;
use lyricsmith_types::message::ConversationState;
use lyricsmith_types::session::SessionId;

use crate::completion::ChatTransport;
use crate::session::SessionStore;

/// Transport that replays a script and records when each attempt ran.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<String, AttemptError>>>,
    calls: Mutex<Vec<Instant>>,
    seen: Mutex<Vec<ChatCompletionRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<String, AttemptError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Time between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Every request the transport was asked to send.
    pub fn seen(&self) -> Vec<ChatCompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl ChatTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &ChatCompletionRequest,
        _api_key: &SecretString,
    ) -> Result<String, AttemptError> {
        self.calls.lock().unwrap().push(Instant::now());
        self.seen.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AttemptError::Transport("script exhausted".to_string())))
    }
}

/// A 200 body whose first choice carries `content`.
pub fn ok_body(content: &str) -> Result<String, AttemptError> {
    Ok(serde_json::json!({
        "id": "gen-123",
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string())
}

pub fn status(code: u16) -> Result<String, AttemptError> {
    Err(AttemptError::Status {
        status: code,
        body: String::new(),
    })
}

/// HashMap-backed store without expiry.
#[derive(Default)]
pub struct MemoryStore {
    conversations: Mutex<HashMap<SessionId, ConversationState>>,
    results: Mutex<HashMap<SessionId, GenerationResult>>,
}

impl SessionStore for MemoryStore {
    async fn get_conversation(&self, id: &SessionId) -> Result<Option<ConversationState>, StoreError> {
        Ok(self.conversations.lock().unwrap().get(id).cloned())
    }

    async fn put_conversation(
        &self,
        id: &SessionId,
        conversation: ConversationState,
    ) -> Result<(), StoreError> {
        self.conversations.lock().unwrap().insert(*id, conversation);
        Ok(())
    }

    async fn delete_conversation(&self, id: &SessionId) -> Result<bool, StoreError> {
        Ok(self.conversations.lock().unwrap().remove(id).is_some())
    }

    async fn get_result(&self, id: &SessionId) -> Result<Option<GenerationResult>, StoreError> {
        Ok(self.results.lock().unwrap().get(id).cloned())
    }

    async fn put_result(&self, id: &SessionId, result: GenerationResult) -> Result<(), StoreError> {
        self.results.lock().unwrap().insert(*id, result);
        Ok(())
    }

    async fn clear(&self, id: &SessionId) -> Result<(), StoreError> {
        self.conversations.lock().unwrap().remove(id);
        self.results.lock().unwrap().remove(id);
        Ok(())
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, StoreError> {
        Ok(0)
    }
}
