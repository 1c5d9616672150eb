//! Request-level services that tie prompt building, completion and
//! session storage together.

pub mod chat;
pub mod generation;

pub use self::chat::{ChatService, MAX_CHAT_MESSAGE_CHARS};
pub use self::generation::GenerationService;
