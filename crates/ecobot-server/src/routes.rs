use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.settings.server.static_dir.clone();

    let pages = Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/quiz", ServeFile::new(static_dir.join("quiz_game.html")))
        .route_service(
            "/eco-adventure",
            ServeFile::new(static_dir.join("eco_adventure.html")),
        )
        .route_service("/word-game", ServeFile::new(static_dir.join("word_game.html")));

    let api = Router::new()
        .route("/chat", post(handlers::chat::chat_handler))
        .route("/get_questions", get(handlers::games::get_questions))
        .route("/get_scenarios", get(handlers::games::get_scenarios))
        .route("/get_words", get(handlers::games::get_words))
        .route("/health", get(handlers::health::health_check))
        .with_state(Arc::new(state));

    Router::new()
        .merge(pages)
        .merge(api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CatchPanicLayer::new())
        // Tracing; headers stay out of spans since they carry the session cookie
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
