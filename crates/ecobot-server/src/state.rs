use anyhow::Result;
use std::sync::Arc;

use crate::config::Settings;
use crate::security::SessionCookieSigner;
use crate::services::{
    ConversationManager, FallbackContent, GameService, LlmProvider, SessionStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub conversation_manager: Arc<ConversationManager>,
    pub sessions: Arc<dyn SessionStore>,
    pub games: Arc<GameService>,
    pub cookie_signer: Arc<SessionCookieSigner>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        provider: Arc<dyn LlmProvider>,
        sessions: Arc<dyn SessionStore>,
        fallback: Arc<FallbackContent>,
    ) -> Result<Self> {
        let cookie_signer = Arc::new(SessionCookieSigner::new(&settings.session.secret_key)?);

        let conversation_manager = Arc::new(ConversationManager::new(
            provider.clone(),
            sessions.clone(),
            &settings.prompts.chat_system_prompt,
        ));

        let games = Arc::new(GameService::new(provider, fallback));

        Ok(Self {
            settings: Arc::new(settings),
            conversation_manager,
            sessions,
            games,
            cookie_signer,
        })
    }
}
