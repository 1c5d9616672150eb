//! Form-driven lyric generation.
//!
//! Endpoints:
//! - POST /generate       - form submission (multipart or urlencoded)
//! - POST /generate-form  - same handler, used by the standalone form page
//!
//! On success the lyrics are kept in the session and the client is told
//! where to fetch them: `{"success": true, "redirect": "/result"}`.

use axum::Json;
use axum::extract::{Form, FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Value, json};

use lyricsmith_types::generation::GenerationRequest;

use crate::http::error::AppError;
use crate::http::extractors::session::SessionCookie;
use crate::state::AppState;

/// POST /generate - Generate lyrics from the form fields.
pub async fn generate(
    State(state): State<AppState>,
    session: SessionCookie,
    request: Request,
) -> Result<(SessionCookie, Json<Value>), AppError> {
    let fields = read_form_fields(request, &state).await?;
    let generation = GenerationRequest::from_fields(fields);

    tracing::info!(
        session = %session.id,
        language = %generation.language,
        genre = %generation.genre,
        "generation requested"
    );

    state
        .generation_service
        .generate(&session.id, generation)
        .await
        .map_err(AppError::generation)?;

    Ok((session, Json(json!({ "success": true, "redirect": "/result" }))))
}

/// Collect the raw key/value pairs of a multipart or urlencoded body,
/// preserving repeated keys.
async fn read_form_fields(
    request: Request,
    state: &AppState,
) -> Result<Vec<(String, String)>, AppError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut fields = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            fields.push((name, value));
        }
        Ok(fields)
    } else {
        let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(fields)
    }
}
