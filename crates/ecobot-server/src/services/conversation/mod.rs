//! Chat conversation state
//!
//! Provides:
//! - Session transcript storage with idle expiry (DashMap)
//! - Turn handling against the model provider

mod cache;
pub mod manager;

pub use cache::{InMemorySessionStore, SessionStore};
pub use manager::{ChatError, ConversationManager};
