//! Core logic for Lyricsmith.
//!
//! - [`prompt`]: turns form input and chat settings into model instructions
//! - [`completion`]: chat-completion client with bounded retries
//! - [`session`]: storage trait for per-session state
//! - [`service`]: chat and form-generation flows
//!
//! I/O lives behind the [`completion::ChatTransport`] and
//! [`session::SessionStore`] traits; concrete implementations are in
//! lyricsmith-infra.

pub mod completion;
pub mod prompt;
pub mod service;
pub mod session;

#[cfg(test)]
mod testing;
