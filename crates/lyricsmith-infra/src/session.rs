//! In-memory [`SessionStore`] backed by `DashMap`.
//!
//! Each session holds its conversation and its latest generation result.
//! Entries idle for longer than the TTL read as absent and are removed by
//! [`SessionStore::purge_expired`], which the server calls periodically.
//! All reads return cloned values; no `DashMap` guard outlives a call.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;

use lyricsmith_core::session::SessionStore;
use lyricsmith_types::error::StoreError;
use lyricsmith_types::generation::GenerationResult;
use lyricsmith_types::message::ConversationState;
use lyricsmith_types::session::SessionId;

#[derive(Debug, Clone)]
struct SessionEntry {
    conversation: Option<ConversationState>,
    result: Option<GenerationResult>,
    touched_at: DateTime<Utc>,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            conversation: None,
            result: None,
            touched_at: now,
        }
    }

    fn is_empty(&self) -> bool {
        self.conversation.is_none() && self.result.is_none()
    }
}

/// Process-local session storage. Lost on restart.
pub struct InMemorySessionStore {
    entries: DashMap<SessionId, SessionEntry>,
    ttl: TimeDelta,
}

impl InMemorySessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Build from a TTL in seconds, as found in `[session]` config.
    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        let secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self::new(TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX))
    }

    /// Number of live sessions, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.touched_at) > self.ttl
    }

    /// Read through a live entry, refreshing its idle timer.
    fn read<R>(&self, id: &SessionId, f: impl FnOnce(&SessionEntry) -> Option<R>) -> Option<R> {
        let now = Utc::now();
        let mut entry = self.entries.get_mut(id)?;
        if self.is_expired(&entry, now) {
            return None;
        }
        entry.touched_at = now;
        f(&entry)
    }

    /// Modify the entry for `id`, creating it (or replacing an expired one).
    fn write(&self, id: &SessionId, f: impl FnOnce(&mut SessionEntry)) {
        let now = Utc::now();
        let mut entry = self.entries.entry(*id).or_insert_with(|| SessionEntry::new(now));
        if self.is_expired(&entry, now) {
            *entry = SessionEntry::new(now);
        }
        entry.touched_at = now;
        f(&mut entry);
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(TimeDelta::days(1))
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get_conversation(&self, id: &SessionId) -> Result<Option<ConversationState>, StoreError> {
        Ok(self.read(id, |entry| entry.conversation.clone()))
    }

    async fn put_conversation(
        &self,
        id: &SessionId,
        conversation: ConversationState,
    ) -> Result<(), StoreError> {
        self.write(id, |entry| entry.conversation = Some(conversation));
        Ok(())
    }

    async fn delete_conversation(&self, id: &SessionId) -> Result<bool, StoreError> {
        let now = Utc::now();
        let removed = match self.entries.get_mut(id) {
            Some(mut entry) => {
                let live = !self.is_expired(&entry, now);
                live && entry.conversation.take().is_some()
            }
            None => false,
        };
        // Drop the entry entirely once nothing is left in it.
        self.entries.remove_if(id, |_, entry| entry.is_empty());
        Ok(removed)
    }

    async fn get_result(&self, id: &SessionId) -> Result<Option<GenerationResult>, StoreError> {
        Ok(self.read(id, |entry| entry.result.clone()))
    }

    async fn put_result(&self, id: &SessionId, result: GenerationResult) -> Result<(), StoreError> {
        self.write(id, |entry| entry.result = Some(result));
        Ok(())
    }

    async fn clear(&self, id: &SessionId) -> Result<(), StoreError> {
        self.entries.remove(id);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !self.is_expired(entry, now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            tracing::debug!(purged, remaining = self.entries.len(), "purged expired sessions");
        }
        Ok(purged)
    }
}
