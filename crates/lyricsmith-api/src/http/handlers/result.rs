//! GET /result - the session's most recent lyrics.
//!
//! Returns `{"lyrics", "inputs", "created_at"}`. Browsers navigating here
//! (`Accept: text/html`) get `result.html` from the web directory, which
//! fetches the JSON itself. Without a stored result the client is sent
//! back to `/`.

use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::ACCEPT;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::json;

use crate::http::error::AppError;
use crate::http::extractors::session::SessionCookie;
use crate::state::AppState;

const RESULT_PAGE: &str = "result.html";

pub async fn get_result(
    State(state): State<AppState>,
    session: SessionCookie,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if session.is_new {
        return Ok(Redirect::to("/").into_response());
    }

    let Some(result) = state
        .generation_service
        .latest(&session.id)
        .await
        .map_err(AppError::generation)?
    else {
        return Ok(Redirect::to("/").into_response());
    };

    if wants_html(&headers) {
        let page = Path::new(&state.config.server.web_dir).join(RESULT_PAGE);
        match tokio::fs::read_to_string(&page).await {
            Ok(html) => return Ok(Html(html).into_response()),
            Err(e) => tracing::debug!(path = %page.display(), error = %e, "result page unavailable, sending JSON"),
        }
    }

    Ok(Json(json!({
        "lyrics": result.lyrics,
        "inputs": result.request,
        "created_at": result.created_at,
    }))
    .into_response())
}

/// Whether the client prefers HTML over JSON.
///
/// Compares the `q` weights of `text/html` and `application/json`; on a
/// tie the one listed first wins. Wildcards never select HTML.
fn wants_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mut html: Option<(f32, usize)> = None;
    let mut json: Option<(f32, usize)> = None;
    for (position, range) in accept.split(',').enumerate() {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim();
        let quality = parts
            .filter_map(|param| param.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);

        let slot = if media.eq_ignore_ascii_case("text/html") {
            &mut html
        } else if media.eq_ignore_ascii_case("application/json") {
            &mut json
        } else {
            continue;
        };
        if slot.is_none() {
            *slot = Some((quality, position));
        }
    }

    match (html, json) {
        (Some((hq, _)), _) if hq <= 0.0 => false,
        (Some(_), None) => true,
        (Some((hq, hp)), Some((jq, jp))) => hq > jq || (hq == jq && hp < jp),
        (None, _) => false,
    }
}
