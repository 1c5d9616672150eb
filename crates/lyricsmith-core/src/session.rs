//! SessionStore trait definition.
//!
//! Per-session conversation state and the last generation result live
//! behind this trait. Request handlers receive an implementation through
//! application state; prompt building and the completion client never
//! touch it.
//!
//! Implementations live in lyricsmith-infra (e.g., `InMemorySessionStore`).

use chrono::{DateTime, Utc};

use lyricsmith_types::error::StoreError;
use lyricsmith_types::generation::GenerationResult;
use lyricsmith_types::message::ConversationState;
use lyricsmith_types::session::SessionId;

/// Ephemeral key-value storage keyed by [`SessionId`].
pub trait SessionStore: Send + Sync {
    fn get_conversation(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Option<ConversationState>, StoreError>> + Send;

    /// Store (replace) the conversation for a session.
    fn put_conversation(
        &self,
        id: &SessionId,
        conversation: ConversationState,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Remove the conversation. Returns whether one existed.
    fn delete_conversation(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    fn get_result(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Option<GenerationResult>, StoreError>> + Send;

    /// Store the latest generation result, overwriting any previous one.
    fn put_result(
        &self,
        id: &SessionId,
        result: GenerationResult,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Drop everything held for a session.
    fn clear(&self, id: &SessionId) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Drop sessions idle past the store's TTL. Returns how many were removed.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<usize, StoreError>> + Send;
}
