use crate::models::games::{Difficulty, QuizQuestion, Scenario, WordEntry, WordsQuery};
use crate::state::AppState;
use crate::utils::error::{public_message, ApiError};
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

const DEFAULT_WORD_MODE: &str = "hangman";

/// `GET /get_questions`
pub async fn get_questions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<QuizQuestion>>, ApiError> {
    let start = Instant::now();

    let questions = state.games.quiz_questions().await.map_err(|e| {
        error!("Quiz generation failed: {}", e);
        ApiError::LlmError(public_message(&e, state.settings.server.expose_error_details))
    })?;

    info!(
        count = questions.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Quiz questions served"
    );
    Ok(Json(questions))
}

/// `GET /get_scenarios`
pub async fn get_scenarios(State(state): State<Arc<AppState>>) -> Json<Vec<Scenario>> {
    let scenarios = state.games.scenarios().await;
    info!(count = scenarios.len(), "Adventure scenarios served");
    Json(scenarios)
}

/// `GET /get_words?difficulty=easy|medium|hard&mode=...`
pub async fn get_words(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WordsQuery>,
) -> Json<Vec<WordEntry>> {
    let difficulty = Difficulty::parse(query.difficulty.as_deref());
    let mode = query
        .mode
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_WORD_MODE);

    let words = state.games.words(difficulty, mode).await;
    info!(difficulty = %difficulty, mode, count = words.len(), "Words served");
    Json(words)
}
