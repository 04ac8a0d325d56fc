use anyhow::{bail, Result};
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::services::prompts;

/// Fallback secret used when `FLASK_SECRET_KEY` is not provided.
pub const DEFAULT_SECRET_KEY: &str = "default-secret-key";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub limits: LimitsConfig,
    pub session: SessionConfig,
    pub content: ContentConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Echo provider/internal error detail to clients (diagnostics only)
    pub expose_error_details: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("static"),
            expose_error_details: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            timeout_seconds: 60,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub llm_concurrency: usize,
    pub acquire_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            llm_concurrency: 8,
            acquire_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub secret_key: String,
    pub cookie_name: String,
    pub cookie_max_age_seconds: i64,
    /// Idle lifetime of a server-side transcript
    pub ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            cookie_name: "session_id".to_string(),
            cookie_max_age_seconds: 3600,
            ttl_seconds: 3600,
            sweep_interval_seconds: 300,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ContentConfig {
    /// Replaces the built-in fallback document when set
    pub fallback_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PromptsConfig {
    pub chat_system_prompt: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            chat_system_prompt: prompts::CHAT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build_with(builder, |name| std::env::var(name).ok())
    }

    /// Apply the legacy variables from `lookup` over `builder`, then
    /// deserialize and validate
    fn build_with<F>(builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = builder
            // Variable names the deployment already uses
            .set_override_option("gemini.api_key", lookup("GEMINI_API_KEY"))?
            .set_override_option("session.secret_key", lookup("FLASK_SECRET_KEY"))?
            .set_override_option("server.port", lookup("PORT"))?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;

        if settings.session.secret_key == DEFAULT_SECRET_KEY {
            warn!("FLASK_SECRET_KEY not set, session cookies are signed with the default key");
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gemini.api_key.trim().is_empty() {
            bail!(
                "GEMINI_API_KEY not found in environment variables; \
                 set it in the environment or in a .env file"
            );
        }
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.session.ttl_seconds == 0 {
            bail!("session.ttl_seconds must be non-zero");
        }
        if self.session.secret_key.is_empty() {
            bail!("session.secret_key must not be empty");
        }
        if self.limits.llm_concurrency == 0 {
            bail!("limits.llm_concurrency must be non-zero");
        }
        Ok(())
    }
}
