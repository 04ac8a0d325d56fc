use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    active_sessions: Option<usize>,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (status, active_sessions) = match state.sessions.count().await {
        Ok(count) => ("healthy", Some(count)),
        Err(e) => {
            warn!("Session store unavailable: {}", e);
            ("degraded", None)
        }
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            active_sessions,
        }),
    )
}
