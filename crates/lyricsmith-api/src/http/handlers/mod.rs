//! HTTP request handlers.

pub mod chat;
pub mod generate;
pub mod result;
