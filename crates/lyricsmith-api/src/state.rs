//! Application state wiring all services together.
//!
//! Services are generic over the transport and session-store traits;
//! AppState pins them to the concrete infra implementations.

use std::sync::Arc;

use secrecy::SecretString;

use lyricsmith_core::completion::CompletionClient;
use lyricsmith_core::service::{ChatService, GenerationService};
use lyricsmith_infra::session::InMemorySessionStore;
use lyricsmith_infra::transport::OpenRouterTransport;
use lyricsmith_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteClient = CompletionClient<OpenRouterTransport>;

pub type ConcreteChatService = ChatService<OpenRouterTransport, InMemorySessionStore>;

pub type ConcreteGenerationService = GenerationService<OpenRouterTransport, InMemorySessionStore>;

/// Shared application state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub generation_service: Arc<ConcreteGenerationService>,
    pub session_store: Arc<InMemorySessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the transport, completion client and session store.
    ///
    /// A missing `api_key` still yields a working state; completion calls
    /// then fail with a configuration error.
    pub fn new(config: AppConfig, api_key: Option<SecretString>) -> anyhow::Result<Self> {
        let transport = OpenRouterTransport::new(&config.completion)?;
        let client: Arc<ConcreteClient> = Arc::new(CompletionClient::from_config(
            transport,
            api_key,
            &config.completion,
        ));

        if !client.has_credential() {
            tracing::warn!(
                var = %config.completion.api_key_env,
                "no API key configured; lyric generation will fail until it is set"
            );
        }

        let session_store = Arc::new(InMemorySessionStore::with_ttl_secs(config.session.ttl_secs));

        let chat_service = ChatService::new(client.clone(), session_store.clone());
        let generation_service = GenerationService::new(client, session_store.clone());

        Ok(Self {
            chat_service: Arc::new(chat_service),
            generation_service: Arc::new(generation_service),
            session_store,
            config: Arc::new(config),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}
