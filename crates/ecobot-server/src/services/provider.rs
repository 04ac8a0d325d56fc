use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::chat::Turn;
use crate::utils::error::ProviderError;

/// Text generation backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate the next model turn for `contents`
    async fn generate(&self, contents: &[Turn]) -> Result<String, ProviderError>;
}

/// Single-turn generation from a standalone prompt
pub async fn generate_from_prompt(
    provider: &dyn LlmProvider,
    prompt: &str,
) -> Result<String, ProviderError> {
    provider.generate(&[Turn::user(prompt)]).await
}
