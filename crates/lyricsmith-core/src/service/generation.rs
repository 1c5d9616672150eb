//! One-shot lyric generation from the structured form.

use std::sync::Arc;

use tracing::{Instrument, info, info_span};

use lyricsmith_types::error::ServiceError;
use lyricsmith_types::generation::{GenerationRequest, GenerationResult};
use lyricsmith_types::session::SessionId;

use crate::completion::{ChatTransport, CompletionClient};
use crate::prompt::form_messages;
use crate::session::SessionStore;

/// Form flow: validate, build the prompt, complete, keep the result.
pub struct GenerationService<T, S> {
    client: Arc<CompletionClient<T>>,
    store: Arc<S>,
}

impl<T, S> GenerationService<T, S>
where
    T: ChatTransport,
    S: SessionStore,
{
    pub fn new(client: Arc<CompletionClient<T>>, store: Arc<S>) -> Self {
        Self { client, store }
    }

    /// Generate lyrics and store them as the session's latest result.
    ///
    /// Nothing is stored when validation or the completion fails; a
    /// previous result for the session stays in place.
    pub async fn generate(
        &self,
        session: &SessionId,
        request: GenerationRequest,
    ) -> Result<GenerationResult, ServiceError> {
        request.validate()?;

        let span = info_span!(
            "lyrics.generate",
            %session,
            language = %request.language,
            genre = %request.genre,
        );

        async {
            let messages = form_messages(&request);
            let lyrics = self.client.complete(&messages).await?;

            let result = GenerationResult::new(lyrics, request);
            self.store.put_result(session, result.clone()).await?;
            info!(chars = result.lyrics.chars().count(), "lyrics generated");
            Ok::<_, ServiceError>(result)
        }
        .instrument(span)
        .await
    }

    /// Most recent result for the session, if any.
    pub async fn latest(&self, session: &SessionId) -> Result<Option<GenerationResult>, ServiceError> {
        Ok(self.store.get_result(session).await?)
    }
}
