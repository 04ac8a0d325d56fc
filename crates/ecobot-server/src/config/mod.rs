pub mod settings;

pub use settings::{
    ContentConfig, GeminiConfig, LimitsConfig, PromptsConfig, ServerConfig, SessionConfig,
    Settings,
};
