//! HTTP layer for Lyricsmith.
//!
//! Axum routes consumed by the static pages: form generation, chat,
//! result retrieval and health. Every JSON error body has the shape
//! `{"error": "<message>"}`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
