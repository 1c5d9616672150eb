//! Session cookie extractor.
//!
//! Reads the session id from the configured cookie. Requests without a
//! valid id get a fresh [`SessionId`]; returning the extractor as part of
//! the response then sets the cookie:
//!
//! ```text
//! Set-Cookie: lyricsmith_session=<uuid>; Path=/; HttpOnly; SameSite=Lax
//! ```

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};

use lyricsmith_types::session::SessionId;

use crate::state::AppState;

/// The caller's session, resolved from (or newly assigned to) the cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub id: SessionId,
    pub is_new: bool,
    cookie_name: String,
}

impl SessionCookie {
    /// Resolve the session from request headers.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        match find_session_id(headers, cookie_name) {
            Some(id) => Self {
                id,
                is_new: false,
                cookie_name: cookie_name.to_string(),
            },
            None => Self {
                id: SessionId::new(),
                is_new: true,
                cookie_name: cookie_name.to_string(),
            },
        }
    }

    /// `Set-Cookie` header value for this session.
    pub fn set_cookie_value(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", self.cookie_name, self.id)
    }
}

impl FromRequestParts<AppState> for SessionCookie {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionCookie::from_headers(&parts.headers, state.cookie_name()))
    }
}

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if self.is_new {
            match HeaderValue::from_str(&self.set_cookie_value()) {
                Ok(value) => {
                    res.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => tracing::warn!(error = %e, "invalid session cookie value, not set"),
            }
        }
        Ok(res)
    }
}

/// Find and parse `name=<uuid>` across all `Cookie` headers.
fn find_session_id(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| value.trim().trim_matches('"').parse().ok())
}
