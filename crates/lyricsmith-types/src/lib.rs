//! Shared domain types for Lyricsmith.
//!
//! Generation requests, chat messages, conversation state, configuration
//! and the error taxonomy shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod completion;
pub mod config;
pub mod error;
pub mod generation;
pub mod language;
pub mod message;
pub mod session;
