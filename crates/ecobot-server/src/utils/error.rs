use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message sent to clients when error detail is not exposed
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again later.";

/// Failure talking to the model provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider request timed out")]
    Timeout,

    #[error("provider network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider busy: {0}")]
    Busy(String),
}

impl ProviderError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Timeout | ProviderError::Network(_) => true,
            ProviderError::Http { status, .. } => *status == 429 || *status >= 500,
            ProviderError::EmptyResponse | ProviderError::Decode(_) | ProviderError::Busy(_) => {
                false
            }
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

/// Client-facing text for a failure. Raw detail only leaves the server when
/// `expose` is set.
pub fn public_message(err: &dyn std::error::Error, expose: bool) -> String {
    if expose {
        format!("Sorry, I encountered an error: {}", err)
    } else {
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

/// Failure of a JSON API endpoint, rendered as `{"error": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("LLM error: {0}")]
    LlmError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::LlmError(msg) => {
                tracing::error!("LLM error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
