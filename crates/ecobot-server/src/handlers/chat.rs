use crate::models::chat::{ChatRequest, ChatResponse, SessionId};
use crate::security::SessionCookieSigner;
use crate::state::AppState;
use crate::utils::error::public_message;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use tracing::{error, info};

pub const EMPTY_MESSAGE_RESPONSE: &str = "Please provide a message";

/// Session id from a correctly signed cookie, or a fresh one
fn resolve_session(state: &AppState, jar: &CookieJar) -> SessionId {
    jar.get(&state.settings.session.cookie_name)
        .and_then(|cookie| state.cookie_signer.verify(cookie.value()))
        .unwrap_or_else(SessionCookieSigner::generate_id)
}

fn session_cookie(state: &AppState, session_id: &str) -> Cookie<'static> {
    let session = &state.settings.session;
    Cookie::build((session.cookie_name.clone(), state.cookie_signer.sign(session_id)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(session.cookie_max_age_seconds))
        .build()
}

/// `POST /chat`: one conversational turn. The session cookie is set or
/// refreshed on every response.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let session_id = resolve_session(&state, &jar);
    let jar = jar.add(session_cookie(&state, &session_id));
    let message = request.message.unwrap_or_default();

    if message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            jar,
            Json(ChatResponse {
                response: EMPTY_MESSAGE_RESPONSE.to_string(),
                session_id: Some(session_id),
            }),
        );
    }

    info!(
        session_id = %session_id,
        message_len = message.len(),
        "Chat request"
    );

    match state
        .conversation_manager
        .reply(&session_id, &message)
        .await
    {
        Ok(reply) => (
            StatusCode::OK,
            jar,
            Json(ChatResponse {
                response: reply,
                session_id: None,
            }),
        ),
        Err(e) => {
            error!(session_id = %session_id, "Chat failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                jar,
                Json(ChatResponse {
                    response: public_message(&e, state.settings.server.expose_error_details),
                    session_id: None,
                }),
            )
        }
    }
}
