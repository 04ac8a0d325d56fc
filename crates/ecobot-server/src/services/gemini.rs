use crate::config::GeminiConfig;
use crate::models::chat::{Role, Turn};
use crate::services::provider::LlmProvider;
use crate::utils::error::ProviderError;
use crate::utils::limiters::Limiters;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Google Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    config: GeminiConfig,
    limiters: Arc<Limiters>,
}

// Request Structures
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: Role,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

// Response Structures
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiService {
    pub fn new(config: GeminiConfig, limiters: Arc<Limiters>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self {
            client,
            config,
            limiters,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Delay before retry number `attempt + 1`
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(factor))
    }

    async fn call_once(&self, request: &GenerateContentRequest<'_>) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http { status, body });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        body.into_text().ok_or(ProviderError::EmptyResponse)
    }
}

#[async_trait]
impl LlmProvider for GeminiService {
    async fn generate(&self, contents: &[Turn]) -> Result<String, ProviderError> {
        let (_permit, waited) = Limiters::acquire_timed(
            self.limiters.llm_generate.clone(),
            self.limiters.acquire_timeout,
            "llm_generate",
        )
        .await
        .map_err(|e| ProviderError::Busy(e.to_string()))?;

        let request = GenerateContentRequest {
            contents: contents
                .iter()
                .map(|turn| GeminiContent {
                    role: turn.role,
                    parts: vec![GeminiPart { text: &turn.text }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let mut attempt: u32 = 0;
        loop {
            let start = Instant::now();
            match self.call_once(&request).await {
                Ok(text) => {
                    debug!(
                        model = %self.config.model,
                        attempt,
                        turns = contents.len(),
                        queued_ms = waited.as_millis() as u64,
                        latency_ms = start.elapsed().as_millis() as u64,
                        "Gemini generation succeeded"
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.backoff(attempt);
                    warn!(
                        model = %self.config.model,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Gemini call failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
