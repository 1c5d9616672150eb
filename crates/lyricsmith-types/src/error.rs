use thiserror::Error;

use crate::completion::CompletionError;

/// Caller input rejected before any prompt is built.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please describe your memory")]
    EmptyMemory,

    #[error("Please enter a message")]
    EmptyMessage,

    #[error("{field} is too long ({actual} characters, max {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Errors from session store operations (used by trait definitions in lyricsmith-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the generation and chat services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
