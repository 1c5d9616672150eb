//! Application error type mapping to HTTP status codes and `{error}` bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lyricsmith_types::completion::CompletionError;
use lyricsmith_types::error::{ServiceError, StoreError, ValidationError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Caller input rejected before any completion call.
    Validation(ValidationError),
    /// Completion failed; `context` prefixes the user-facing message.
    Completion {
        context: &'static str,
        error: CompletionError,
    },
    /// Session storage failure.
    Store(StoreError),
    /// Malformed request body.
    BadRequest(String),
}

impl AppError {
    /// Wrap a service error raised while generating lyrics from the form.
    pub fn generation(err: ServiceError) -> Self {
        Self::from_service("Generation failed", err)
    }

    /// Wrap a service error raised by the chat flow.
    pub fn chat(err: ServiceError) -> Self {
        Self::from_service("Chat failed", err)
    }

    fn from_service(context: &'static str, err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => AppError::Validation(e),
            ServiceError::Completion(error) => AppError::Completion { context, error },
            ServiceError::Store(e) => AppError::Store(e),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Completion { .. } | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the end user. Never carries upstream credentials.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Completion { context, error } => format!("{context}: {}", error.user_message()),
            AppError::Store(_) => "Session storage is unavailable. Please try again.".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Completion { error, .. } => {
                tracing::warn!(kind = error.kind(), %error, "completion failed");
            }
            AppError::Store(e) => tracing::error!(error = %e, "session store failure"),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                tracing::debug!(message = %self.message(), "request rejected");
            }
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
