//! Conversational lyric writing.
//!
//! Endpoints:
//! - POST /chat   - `{"message": "...", "language": "hindi"}` -> `{"success": true, "response": "..."}`
//! - POST /clear  - forget the session's conversation

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use lyricsmith_types::language::Language;

use crate::http::error::AppError;
use crate::http::extractors::session::SessionCookie;
use crate::state::AppState;

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Unknown or missing values fall back to English.
    #[serde(default)]
    pub language: Option<String>,
}

/// POST /chat - Send one message and return the assistant's reply.
pub async fn chat(
    State(state): State<AppState>,
    session: SessionCookie,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let language = body
        .language
        .as_deref()
        .map(Language::parse_or_default)
        .unwrap_or_default();

    let reply = state
        .chat_service
        .send(&session.id, &body.message, language)
        .await
        .map_err(AppError::chat)?;

    Ok((session, Json(json!({ "success": true, "response": reply }))))
}

/// POST /clear - Start the conversation over.
pub async fn clear(
    State(state): State<AppState>,
    session: SessionCookie,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    state
        .chat_service
        .clear(&session.id)
        .await
        .map_err(AppError::chat)?;

    Ok((session, Json(json!({ "success": true }))))
}
