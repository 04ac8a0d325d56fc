pub mod conversation;
pub mod extraction;
pub mod fallback;
pub mod games;
pub mod gemini;
pub mod prompts;
pub mod provider;

pub use conversation::{ConversationManager, InMemorySessionStore, SessionStore};
pub use fallback::FallbackContent;
pub use games::GameService;
pub use gemini::GeminiService;
pub use provider::LlmProvider;
