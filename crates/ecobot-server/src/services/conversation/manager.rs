use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use super::cache::SessionStore;
use crate::models::chat::Turn;
use crate::services::prompts::CHAT_SEED_ACK;
use crate::services::provider::LlmProvider;
use crate::utils::error::ProviderError;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("session store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Drives one conversational turn against a session transcript
pub struct ConversationManager {
    provider: Arc<dyn LlmProvider>,
    store: Arc<dyn SessionStore>,
    /// Instruction pair every transcript starts with
    seed: Vec<Turn>,
}

impl ConversationManager {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn SessionStore>,
        system_prompt: &str,
    ) -> Self {
        Self {
            provider,
            store,
            seed: vec![Turn::user(system_prompt), Turn::model(CHAT_SEED_ACK)],
        }
    }

    /// Send `message` with the session's history and record the exchange.
    ///
    /// The user/model pair is appended only after the provider answers, so a
    /// failed call leaves the transcript untouched.
    pub async fn reply(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        let start = Instant::now();

        if self.store.begin(session_id, &self.seed).await? {
            info!(session_id, "Started new chat session");
        }

        let mut contents = match self.store.get(session_id).await? {
            Some(turns) => turns,
            None => {
                // Expired between begin and get
                self.store.begin(session_id, &self.seed).await?;
                self.seed.clone()
            }
        };

        let user_turn = Turn::user(message);
        contents.push(user_turn.clone());
        debug!(session_id, turns = contents.len(), "Sending transcript to provider");

        let reply = self.provider.generate(&contents).await?;

        self.store
            .append(session_id, &self.seed, &[user_turn, Turn::model(reply.clone())])
            .await?;

        info!(
            session_id,
            turns = contents.len() + 1,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Chat reply generated"
        );
        Ok(reply)
    }
}
