//! Infrastructure layer for Lyricsmith.
//!
//! Implements the traits defined in `lyricsmith-core`: the OpenRouter HTTP
//! transport and the in-memory session store. Also loads configuration
//! and resolves the API key from the environment.

pub mod config;
pub mod credential;
pub mod session;
pub mod transport;
