//! Content generation for the quiz, eco-adventure and word games.
//!
//! Every game follows the same flow: prompt the provider, recover a JSON
//! array from the reply, validate it for the game, and fall back to the
//! static lists when nothing usable is left.

pub mod adventure;
pub mod quiz;
pub mod words;

use std::sync::Arc;

use crate::services::fallback::FallbackContent;
use crate::services::provider::LlmProvider;

#[derive(Clone)]
pub struct GameService {
    provider: Arc<dyn LlmProvider>,
    fallback: Arc<FallbackContent>,
}

impl GameService {
    pub fn new(provider: Arc<dyn LlmProvider>, fallback: Arc<FallbackContent>) -> Self {
        Self { provider, fallback }
    }
}
